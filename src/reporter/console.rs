//! Console reporter with colored output

use crate::{
    format_percent, truncate_chars, Assessment, AuthorRecord, Recommendation,
    RecommendationCounts,
};
use colored::{ColoredString, Colorize};
use std::path::Path;

/// Rows shown in the find table
pub const DEFAULT_TOP: usize = 15;
/// Characters of the first sample shown per analyzed author
pub const PREVIEW_CHARS: usize = 80;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Number of authors listed by the find report
    top: usize,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            top: DEFAULT_TOP,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Number of authors listed by `report_find`
    pub fn top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Summary and top table for the find command (authors already in reach order)
    pub fn report_find(&self, authors: &[AuthorRecord], csv_path: &Path) {
        println!();
        println!(
            "{} {} influencers",
            self.paint("Found".into(), |s| s.green().bold()),
            authors.len()
        );
        println!("   Saved to {}", csv_path.display());
        if authors.is_empty() {
            return;
        }
        println!();
        println!(
            "{}",
            self.paint(format!("Top {} by followers:", self.top.min(authors.len())), |s| {
                s.bold()
            })
        );
        for (i, author) in authors.iter().take(self.top).enumerate() {
            println!("{}", self.find_line(i + 1, author));
        }
    }

    /// Counts and non-Skip list for the analyze command (assessments already ranked)
    pub fn report_recommendations(&self, assessments: &[Assessment], outputs: &[&Path]) {
        let counts = RecommendationCounts::from_assessments(assessments);
        println!();
        for path in outputs {
            println!("   Saved to {}", path.display());
        }
        println!("Classified {} authors", counts.total());
        println!("{}", self.counts_line(&counts));

        let shortlisted: Vec<&Assessment> = assessments
            .iter()
            .filter(|a| a.recommendation != Recommendation::Skip)
            .collect();
        if shortlisted.is_empty() {
            return;
        }
        println!();
        for assessment in shortlisted {
            println!("{}", self.assessment_line(assessment));
            if let Some(preview) = preview(assessment) {
                println!("      {}", self.paint(preview, |s| s.dimmed()));
            }
        }
    }

    /// `rank. @username followers tweets likes ✓`
    pub fn find_line(&self, rank: usize, author: &AuthorRecord) -> String {
        format!(
            "{:>3}. @{:<20} {:>10} followers {:>4} tweets {:>7} likes{}",
            rank,
            author.username,
            author.followers_count,
            author.tweets_found,
            author.total_likes,
            verified_mark(author)
        )
    }

    pub fn counts_line(&self, counts: &RecommendationCounts) -> String {
        format!(
            "{}: {} | {}: {} | {}: {}",
            self.colorize_recommendation(Recommendation::StrongHire),
            counts.strong_hire,
            self.colorize_recommendation(Recommendation::Consider),
            counts.consider,
            self.colorize_recommendation(Recommendation::Skip),
            counts.skip
        )
    }

    pub fn assessment_line(&self, assessment: &Assessment) -> String {
        let author = &assessment.author;
        format!(
            "  [{}] @{} | {} followers | ER {} | {} engagements{}",
            self.colorize_recommendation(assessment.recommendation),
            author.username,
            author.followers_count,
            format_percent(assessment.metrics.engagement_rate),
            assessment.metrics.total_engagement,
            verified_mark(author)
        )
    }

    fn colorize_recommendation(&self, rec: Recommendation) -> ColoredString {
        let label = rec.as_str().to_string();
        match rec {
            Recommendation::StrongHire => self.paint(label, |s| s.green().bold()),
            Recommendation::Consider => self.paint(label, |s| s.yellow()),
            Recommendation::Skip => self.paint(label, |s| s.red()),
        }
    }

    fn paint(&self, text: String, style: impl FnOnce(ColoredString) -> ColoredString) -> ColoredString {
        if self.use_colors {
            style(text.as_str().normal())
        } else {
            text.as_str().normal()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn verified_mark(author: &AuthorRecord) -> &'static str {
    if author.verified {
        " ✓"
    } else {
        ""
    }
}

/// First sample on one line, cut to the preview width
fn preview(assessment: &Assessment) -> Option<String> {
    let sample = assessment.author.samples.first()?;
    let flat = sample.text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        return None;
    }
    let cut = truncate_chars(&flat, PREVIEW_CHARS);
    if cut.len() < flat.len() {
        Some(format!("{}…", cut))
    } else {
        Some(flat)
    }
}
