//! Pure filter / sort / truncate stage.
//!
//! Stage order is fixed: minimum length, keyword match, sort, limit.
//! The same input always yields the same output ordering; sorts are
//! stable, so equal keys keep their fetch order.

use youtube_client::Comment;

use crate::settings::{ExportSettings, KeywordMode, SortKey};

/// Apply the job's filters, sort and limit to a fetched comment set.
///
/// Keyword comparison is plain substring match, case-folded on both
/// sides unless `case_sensitive` is set; blank keywords are ignored.
/// Date sorts compare the ISO-8601 timestamp strings lexically.
pub fn apply_filters(comments: Vec<Comment>, settings: &ExportSettings) -> Vec<Comment> {
    let mut items = comments;

    if let Some(min_len) = settings.min_len {
        items.retain(|c| c.text.chars().count() >= min_len);
    }

    let keywords: Vec<String> = settings
        .keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .map(|k| {
            if settings.case_sensitive {
                k.clone()
            } else {
                k.to_lowercase()
            }
        })
        .collect();
    if !keywords.is_empty() {
        items.retain(|c| {
            let text = if settings.case_sensitive {
                c.text.clone()
            } else {
                c.text.to_lowercase()
            };
            match settings.keywords_mode {
                KeywordMode::Any => keywords.iter().any(|k| text.contains(k.as_str())),
                KeywordMode::All => keywords.iter().all(|k| text.contains(k.as_str())),
            }
        });
    }

    match settings.sort {
        SortKey::None => {}
        SortKey::LengthDesc => {
            items.sort_by(|a, b| b.text.chars().count().cmp(&a.text.chars().count()))
        }
        SortKey::LengthAsc => {
            items.sort_by(|a, b| a.text.chars().count().cmp(&b.text.chars().count()))
        }
        SortKey::LikesDesc => items.sort_by(|a, b| b.like_count.cmp(&a.like_count)),
        SortKey::DateNew => items.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        SortKey::DateOld => items.sort_by(|a, b| a.published_at.cmp(&b.published_at)),
    }

    items.truncate(settings.limit as usize);
    items
}
