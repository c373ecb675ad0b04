use crate::error::{CorruptRecord, Result, VendorError};
use crate::model::{local_now, FeedbackEntry, Loaded, Rating, TIMESTAMP_FORMAT};
use crate::store;
use chrono::NaiveDateTime;
use std::path::Path;

const BLOCK_PREFIX: &str = "===== FEEDBACK:";
const BLOCK_SUFFIX: &str = "=====";
const CUSTOMER_PREFIX: &str = "Customer:";
const RATING_PREFIX: &str = "Rating:";
const COMMENTS_PREFIX: &str = "Comments:";

pub fn save_customer_feedback(
    path: &Path,
    customer_name: &str,
    rating: i64,
    comments: &str,
) -> Result<FeedbackEntry> {
    save_customer_feedback_at(
        path,
        customer_name,
        rating,
        comments,
        local_now(),
    )
}

pub(crate) fn save_customer_feedback_at(
    path: &Path,
    customer_name: &str,
    rating: i64,
    comments: &str,
    now: NaiveDateTime,
) -> Result<FeedbackEntry> {
    let customer_name = customer_name.trim();
    if customer_name.is_empty() {
        return Err(VendorError::validation("Customer name cannot be empty"));
    }
    if customer_name.contains(['\n', '\r']) {
        return Err(VendorError::validation(
            "Customer name must fit on a single line",
        ));
    }
    let rating = Rating::new(rating)?;

    let entry = FeedbackEntry {
        timestamp: now,
        customer_name: customer_name.to_string(),
        rating,
        comments: comments.split_whitespace().collect::<Vec<_>>().join(" "),
    };
    store::append_record(path, None, &render_block(&entry))?;

    tracing::info!(customer = %entry.customer_name, rating = %entry.rating, "feedback saved");
    Ok(entry)
}

/// Entries whose text contains `term`, ignoring case. Absent file means no entries.
pub fn search_feedback(path: &Path, term: &str) -> Result<Loaded<Vec<FeedbackEntry>>> {
    let state = store::read_state(path)?;
    let Loaded { value, skipped } = parse_blocks(state.contents());

    let needle = term.trim().to_lowercase();
    let matches = value
        .into_iter()
        .filter(|entry| entry.searchable_text().to_lowercase().contains(&needle))
        .collect();

    Ok(Loaded {
        value: matches,
        skipped,
    })
}

pub fn render_block(entry: &FeedbackEntry) -> String {
    format!(
        "{} {} {}\n{} {}\n{} {}\n{} {}\n\n",
        BLOCK_PREFIX,
        entry.timestamp.format(TIMESTAMP_FORMAT),
        BLOCK_SUFFIX,
        CUSTOMER_PREFIX,
        entry.customer_name,
        RATING_PREFIX,
        entry.rating,
        COMMENTS_PREFIX,
        entry.comments
    )
}

#[derive(Default)]
struct PendingBlock {
    line: usize,
    timestamp: Option<NaiveDateTime>,
    customer: Option<String>,
    rating: Option<String>,
    comments: Option<String>,
}

impl PendingBlock {
    fn finish(self) -> std::result::Result<FeedbackEntry, CorruptRecord> {
        let corrupt = |reason: &str| CorruptRecord::new(self.line, reason);

        let timestamp = self.timestamp.ok_or_else(|| corrupt("bad block timestamp"))?;
        let customer_name = self
            .customer
            .filter(|c| !c.is_empty())
            .ok_or_else(|| corrupt("missing customer"))?;
        let rating_text = self.rating.ok_or_else(|| corrupt("missing rating"))?;
        let rating = rating_text
            .split('/')
            .next()
            .unwrap_or_default()
            .parse::<Rating>()
            .map_err(|_| corrupt("unreadable rating"))?;

        Ok(FeedbackEntry {
            timestamp,
            customer_name,
            rating,
            comments: self.comments.unwrap_or_default(),
        })
    }
}

fn parse_blocks(content: &str) -> Loaded<Vec<FeedbackEntry>> {
    let mut entries = Vec::new();
    let mut skipped = Vec::new();
    let mut current: Option<PendingBlock> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();

        if let Some(rest) = line.strip_prefix(BLOCK_PREFIX) {
            if let Some(block) = current.take() {
                close_block(block, &mut entries, &mut skipped);
            }
            let stamp = rest.trim().trim_end_matches('=').trim();
            current = Some(PendingBlock {
                line: idx + 1,
                timestamp: NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok(),
                ..PendingBlock::default()
            });
            continue;
        }

        if line.is_empty() {
            if let Some(block) = current.take() {
                close_block(block, &mut entries, &mut skipped);
            }
            continue;
        }

        // Text outside a block is ignored.
        let Some(block) = current.as_mut() else {
            continue;
        };
        if let Some(rest) = line.strip_prefix(CUSTOMER_PREFIX) {
            block.customer = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(RATING_PREFIX) {
            block.rating = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix(COMMENTS_PREFIX) {
            block.comments = Some(rest.trim().to_string());
        }
    }
    if let Some(block) = current.take() {
        close_block(block, &mut entries, &mut skipped);
    }

    Loaded {
        value: entries,
        skipped,
    }
}

fn close_block(
    block: PendingBlock,
    entries: &mut Vec<FeedbackEntry>,
    skipped: &mut Vec<CorruptRecord>,
) {
    match block.finish() {
        Ok(entry) => entries.push(entry),
        Err(record) => {
            tracing::warn!("skipping feedback block at {}", record);
            skipped.push(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn saves_block_in_expected_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");

        save_customer_feedback_at(&path, "John Doe", 4, "Great food and quick service!", noon())
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "===== FEEDBACK: 2023-01-01 12:00:00 =====\n\
             Customer: John Doe\n\
             Rating: 4/5\n\
             Comments: Great food and quick service!\n\n"
        );
    }

    #[test]
    fn save_then_search_finds_exactly_that_block() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");

        let saved = save_customer_feedback(&path, "John Doe", 4, "Great food").unwrap();
        save_customer_feedback(&path, "Asha", 2, "Too salty").unwrap();

        let found = search_feedback(&path, "great").unwrap();
        assert!(found.skipped.is_empty());
        assert_eq!(found.value, vec![saved]);
    }

    #[test]
    fn rejects_invalid_input_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");

        assert!(save_customer_feedback(&path, "John", 6, "").is_err());
        assert!(save_customer_feedback(&path, "John", 0, "").is_err());
        assert!(save_customer_feedback(&path, "  ", 3, "").is_err());
        assert!(save_customer_feedback(&path, "Jo\nhn", 3, "").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn comments_are_optional_and_flattened() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");

        let entry = save_customer_feedback(&path, "Ravi", 5, "loved\nthe   chai").unwrap();
        assert_eq!(entry.comments, "loved the chai");
        save_customer_feedback(&path, "Mina", 3, "").unwrap();

        let all = search_feedback(&path, "").unwrap().value;
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].comments, "");
    }

    #[test]
    fn search_on_absent_or_empty_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");
        assert!(search_feedback(&path, "test").unwrap().value.is_empty());

        fs::write(&path, "").unwrap();
        assert!(search_feedback(&path, "test").unwrap().value.is_empty());
    }

    #[test]
    fn search_without_match_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");
        fs::write(
            &path,
            "===== FEEDBACK: 2023-01-01 12:00:00 =====\n\
             Customer: John Doe\n\
             Rating: 4/5\n\
             Comments: Great food and service!\n\n",
        )
        .unwrap();

        assert!(search_feedback(&path, "terrible").unwrap().value.is_empty());
        assert_eq!(search_feedback(&path, "JOHN").unwrap().value.len(), 1);
        assert_eq!(search_feedback(&path, "4/5").unwrap().value.len(), 1);
    }

    #[test]
    fn last_block_without_trailing_blank_line_is_read() {
        let content = "===== FEEDBACK: 2023-01-01 12:00:00 =====\n\
                       Customer: A\n\
                       Rating: 5/5\n\
                       Comments: ok\n\
                       ===== FEEDBACK: 2023-01-02 09:30:00 =====\n\
                       Customer: B\n\
                       Rating: 1/5\n\
                       Comments: cold";
        let loaded = parse_blocks(content);
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(loaded.value[1].customer_name, "B");
        assert_eq!(loaded.value[1].rating.value(), 1);
    }

    #[test]
    fn save_after_unterminated_comments_keeps_both_blocks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("feedback.txt");
        fs::write(
            &path,
            "===== FEEDBACK: 2023-01-01 11:00:00 =====\n\
             Customer: A\n\
             Rating: 5/5\n\
             Comments: ok",
        )
        .unwrap();

        save_customer_feedback_at(&path, "B", 3, "fine", noon()).unwrap();

        let loaded = search_feedback(&path, "").unwrap();
        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.value.len(), 2);
        assert_eq!(loaded.value[0].comments, "ok");
        assert_eq!(loaded.value[1].customer_name, "B");
    }

    #[test]
    fn unreadable_blocks_are_skipped() {
        let content = "===== FEEDBACK: yesterday =====\n\
                       Customer: A\n\
                       Rating: 5/5\n\n\
                       ===== FEEDBACK: 2023-01-02 09:30:00 =====\n\
                       Customer: B\n\
                       Rating: ten/5\n\n\
                       ===== FEEDBACK: 2023-01-03 09:30:00 =====\n\
                       Customer: C\n\
                       Rating: 3/5\n\
                       Comments: fine\n";
        let loaded = parse_blocks(content);
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].customer_name, "C");
        assert_eq!(loaded.skipped.len(), 2);
        assert_eq!(loaded.skipped[0].line, 1);
    }
}
