//! Pagination for the manual bulk-listing surface
//!
//! A bulk listing larger than one message is split into pages. Only the
//! first page is sent as a new message; subsequent pages are delivered by
//! editing that same message in place after a fixed inter-page delay. This
//! keeps channel history to one message per listing instead of spamming the
//! channel. Per-item notifications never paginate.

use std::time::Duration;

use super::{ChatApi, MessageId, MessagePayload, DESCRIPTION_MAX};
use crate::error::NotifyError;

/// Lines per listing page
pub const PAGE_LINES: usize = 80;

/// Delay between in-place page edits
pub const PAGE_DELAY: Duration = Duration::from_secs(2);

/// Chunk listing lines into page bodies.
///
/// Pages hold at most [`PAGE_LINES`] lines and never exceed the platform
/// description limit; a page is flushed early if the next line would
/// overflow it. A single line longer than the limit is truncated on a char
/// boundary and becomes a page of its own.
pub fn pages(lines: &[String]) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for line in lines {
        let line = match line.char_indices().nth(DESCRIPTION_MAX) {
            Some((byte_idx, _)) => &line[..byte_idx],
            None => line.as_str(),
        };
        let needed = line.chars().count() + usize::from(!current.is_empty());
        if !current.is_empty()
            && (count == PAGE_LINES || current.chars().count() + needed > DESCRIPTION_MAX)
        {
            result.push(std::mem::take(&mut current));
            count = 0;
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
        count += 1;
    }
    if !current.is_empty() {
        result.push(current);
    }
    result
}

/// Deliver a multi-page listing: send the first page, edit the rest in.
///
/// Edit failures on later pages are logged and skipped so an early
/// permission change cannot strand the listing mid-way.
pub async fn deliver_paged(
    api: &dyn ChatApi,
    channel_id: u64,
    payloads: &[MessagePayload],
    delay: Duration,
) -> Result<Option<MessageId>, NotifyError> {
    let Some(first) = payloads.first() else {
        return Ok(None);
    };

    let message_id = api.send_message(channel_id, first).await?;

    for payload in &payloads[1..] {
        tokio::time::sleep(delay).await;
        if let Err(e) = api.edit_message(channel_id, &message_id, payload).await {
            tracing::error!(channel = channel_id, error = %e, "failed to edit listing page");
        }
    }

    Ok(Some(message_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn test_empty_lines_no_pages() {
        assert!(pages(&[]).is_empty());
    }

    #[test]
    fn test_single_page() {
        let result = pages(&lines(10));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].lines().count(), 10);
    }

    #[test]
    fn test_line_count_split() {
        let result = pages(&lines(PAGE_LINES * 2 + 1));
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].lines().count(), PAGE_LINES);
        assert_eq!(result[2].lines().count(), 1);
    }

    #[test]
    fn test_oversized_line_truncated_without_empty_page() {
        let lines = vec![
            "x".repeat(DESCRIPTION_MAX + 500),
            "short line".to_string(),
        ];

        let result = pages(&lines);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|page| !page.is_empty()));
        assert_eq!(result[0].chars().count(), DESCRIPTION_MAX);
        assert_eq!(result[1], "short line");
    }

    #[test]
    fn test_char_limit_split() {
        // Few lines, each close to the description bound.
        let big: Vec<String> = (0..3).map(|i| format!("{i}").repeat(3000)).collect();
        let result = pages(&big);
        assert_eq!(result.len(), 3);
        for page in &result {
            assert!(page.chars().count() <= DESCRIPTION_MAX);
        }
    }
}
