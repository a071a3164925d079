//! Client-side pagination helpers.
//!
//! Two distinct mechanisms live here. The admin overview uses real
//! server-side pages and only needs the button-row windowing; replies are
//! fully fetched with their parent comment and windowed locally, so "load
//! more replies" never issues a network call.

use crate::models::Reply;

/// How many replies each "load more" click reveals.
pub const REPLY_PAGE_SIZE: usize = 10;

/// How many page buttons the admin overview shows at once.
const PAGE_BUTTON_WINDOW: usize = 5;

/// One slot in the page-number button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

/// Compress a page range into at most [`PAGE_BUTTON_WINDOW`] numbered
/// buttons plus ellipsis placeholders.
///
/// Selection rule: all pages when there are five or fewer; the first four
/// plus the last page near the start; the first page plus the last four
/// near the end; otherwise first, current±1, last.
pub fn page_window(current: usize, total: usize) -> Vec<PageToken> {
    use PageToken::*;

    if total <= PAGE_BUTTON_WINDOW {
        return (1..=total).map(Page).collect();
    }

    if current <= 3 {
        let mut out: Vec<PageToken> = (1..=4).map(Page).collect();
        out.push(Ellipsis);
        out.push(Page(total));
        return out;
    }

    if current >= total - 2 {
        let mut out = vec![Page(1), Ellipsis];
        out.extend((total - 3..=total).map(Page));
        return out;
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}

/// Local window over an already-fully-fetched reply list.
///
/// Tracks how many "load more" clicks have happened; the replies themselves
/// stay on the parent comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplyWindow {
    clicks: usize,
}

impl ReplyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal the next page.
    pub fn reveal_more(&mut self) {
        self.clicks += 1;
    }

    /// Number of replies currently visible out of `total`.
    pub fn visible_count(&self, total: usize) -> usize {
        total.min((self.clicks + 1) * REPLY_PAGE_SIZE)
    }

    /// Replies still hidden behind the "load more" affordance. Zero means
    /// the affordance disappears.
    pub fn hidden_count(&self, total: usize) -> usize {
        total - self.visible_count(total)
    }

    /// The visible prefix of the reply list.
    pub fn visible_slice<'a>(&self, replies: &'a [Reply]) -> &'a [Reply] {
        &replies[..self.visible_count(replies.len())]
    }
}
