//! Module search path templates
//!
//! A template such as `./cservice/?.so;/usr/lib/svc/?.so` lists the places a
//! module's library may live. Each `;`-separated segment carries exactly one
//! `?`, which is replaced by the module name.

use std::fmt;
use std::path::PathBuf;

use crate::module::traits::ModuleError;

/// Segment separator
pub const SEGMENT_SEPARATOR: char = ';';

/// Placeholder for the module name inside a segment
pub const WILDCARD: char = '?';

/// One validated segment, split around its wildcard
#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    prefix: String,
    suffix: String,
}

/// Parsed, validated search path template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse and validate a template
    ///
    /// Empty segments are skipped. Every remaining segment must contain
    /// exactly one wildcard, and at least one segment must remain.
    pub fn parse(template: &str) -> Result<Self, ModuleError> {
        let mut segments = Vec::new();

        for segment in template.split(SEGMENT_SEPARATOR) {
            if segment.is_empty() {
                continue;
            }

            let wildcards = segment.matches(WILDCARD).count();
            if wildcards != 1 {
                return Err(ModuleError::InvalidSearchPath {
                    segment: segment.to_string(),
                    reason: format!("expected exactly one '{}', found {}", WILDCARD, wildcards),
                });
            }

            // Checked above: exactly one wildcard
            if let Some((prefix, suffix)) = segment.split_once(WILDCARD) {
                segments.push(Segment {
                    prefix: prefix.to_string(),
                    suffix: suffix.to_string(),
                });
            }
        }

        if segments.is_empty() {
            return Err(ModuleError::InvalidSearchPath {
                segment: template.to_string(),
                reason: "template has no segments".to_string(),
            });
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// Candidate library paths for `name`, in search order
    pub fn resolve<'a>(&'a self, name: &'a str) -> CandidatePaths<'a> {
        CandidatePaths {
            segments: self.segments.iter(),
            name,
        }
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for PathTemplate {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lazy iterator over the candidate paths of one module name
///
/// Clone it to walk the candidates again from the start.
#[derive(Debug, Clone)]
pub struct CandidatePaths<'a> {
    segments: std::slice::Iter<'a, Segment>,
    name: &'a str,
}

impl Iterator for CandidatePaths<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let segment = self.segments.next()?;
        let mut path =
            String::with_capacity(segment.prefix.len() + self.name.len() + segment.suffix.len());
        path.push_str(&segment.prefix);
        path.push_str(self.name);
        path.push_str(&segment.suffix);
        Some(PathBuf::from(path))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.segments.size_hint()
    }
}

impl ExactSizeIterator for CandidatePaths<'_> {}
