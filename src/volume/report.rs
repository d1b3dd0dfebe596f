//! Render report types for structured diagnostics.
//!
//! Materialization never fails because of a bad polygon; it skips the bad
//! piece and records why here, so callers can surface it to annotators.

use std::fmt;

use serde::Serialize;

/// Everything that was skipped while materializing one task.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RenderReport {
    /// All issues, in the order they were encountered.
    pub issues: Vec<RenderIssue>,

    /// Polygons whose coverage was written to the grid.
    pub polygons_applied: usize,

    /// Polygons skipped as a whole.
    pub polygons_skipped: usize,
}

impl RenderReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: RenderIssue) {
        self.issues.push(issue);
    }

    /// Number of issues with the given code.
    pub fn count(&self, code: IssueCode) -> usize {
        self.issues.iter().filter(|i| i.code == code).count()
    }

    /// Returns true if nothing was skipped.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for RenderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rendered {} polygon(s), skipped {}",
            self.polygons_applied, self.polygons_skipped
        )?;
        if self.issues.is_empty() {
            return writeln!(f, "No issues found");
        }

        writeln!(f, "{} issue(s):", self.issues.len())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

/// A single skipped unit of annotation.
#[derive(Clone, Debug, Serialize)]
pub struct RenderIssue {
    /// A stable code for the issue type.
    pub code: IssueCode,

    /// A human-readable description.
    pub message: String,

    /// Where the issue occurred.
    pub context: IssueContext,
}

impl RenderIssue {
    pub fn new(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            code,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for RenderIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WARN] {:?} in {}: {}", self.code, self.context, self.message)
    }
}

/// A stable code identifying the kind of skipped annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    /// A ring with fewer than three vertices.
    RingTooFewVertices,
    /// A ring containing a vertex that is not an `(x, y)` pair.
    RingNotTwoDimensional,
    /// A ring containing a NaN or infinite vertex.
    RingNotFinite,
    /// A polygon whose slice lies outside the task's z range.
    SliceOutOfBounds,
    /// A polygon carrying the reserved segment id 0.
    UnlabeledSegment,
}

/// Where a render issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// A whole polygon.
    Polygon {
        checkpoint: usize,
        polygon: usize,
        segment: u64,
    },
    /// One ring of a polygon.
    Ring {
        checkpoint: usize,
        polygon: usize,
        negative: bool,
        ring: usize,
    },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Polygon {
                checkpoint,
                polygon,
                segment,
            } => write!(
                f,
                "checkpoint {} polygon {} (segment {})",
                checkpoint, polygon, segment
            ),
            IssueContext::Ring {
                checkpoint,
                polygon,
                negative,
                ring,
            } => write!(
                f,
                "checkpoint {} polygon {} {} region {}",
                checkpoint,
                polygon,
                if *negative { "negative" } else { "positive" },
                ring
            ),
        }
    }
}
