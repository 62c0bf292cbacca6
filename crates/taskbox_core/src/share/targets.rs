//! Share targets and link construction.
//!
//! # Invariants
//! - User content only ever reaches a link through URL query encoding.
//! - Each link target keeps the parameter names of its public share endpoint.

use crate::model::task::Task;
use crate::share::dispatch::ShareError;
use crate::share::format::format_task_text;
use std::fmt::{Display, Formatter};
use url::Url;

const VK_SHARE_ENDPOINT: &str = "https://vk.com/share.php";
const TELEGRAM_SHARE_ENDPOINT: &str = "https://t.me/share/url";
const WHATSAPP_SHARE_ENDPOINT: &str = "https://wa.me/";
const FACEBOOK_SHARE_ENDPOINT: &str = "https://www.facebook.com/sharer/sharer.php";

/// Destinations offered by the share dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareTarget {
    Clipboard,
    Vk,
    Telegram,
    WhatsApp,
    Facebook,
}

impl ShareTarget {
    pub const ALL: [ShareTarget; 5] = [
        Self::Clipboard,
        Self::Vk,
        Self::Telegram,
        Self::WhatsApp,
        Self::Facebook,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clipboard => "clipboard",
            Self::Vk => "vk",
            Self::Telegram => "telegram",
            Self::WhatsApp => "whatsapp",
            Self::Facebook => "facebook",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "clipboard" | "copy" => Some(Self::Clipboard),
            "vk" => Some(Self::Vk),
            "telegram" => Some(Self::Telegram),
            "whatsapp" => Some(Self::WhatsApp),
            "facebook" => Some(Self::Facebook),
            _ => None,
        }
    }

    pub fn is_link(self) -> bool {
        !matches!(self, Self::Clipboard)
    }
}

impl Display for ShareTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the outbound link for a link-based target.
///
/// Returns `Ok(None)` for [`ShareTarget::Clipboard`], which has no link.
/// `page_url` must be an absolute URL; anything else is [`ShareError::Link`].
pub fn share_link(
    target: ShareTarget,
    task: &Task,
    page_url: &str,
) -> Result<Option<Url>, ShareError> {
    if target == ShareTarget::Clipboard {
        return Ok(None);
    }

    let page = Url::parse(page_url)?;
    let page_url = page.as_str();
    let text = format_task_text(task);
    let link = match target {
        ShareTarget::Clipboard => return Ok(None),
        ShareTarget::Vk => Url::parse_with_params(
            VK_SHARE_ENDPOINT,
            [
                ("url", page_url),
                ("title", task.title.as_str()),
                ("description", text.as_str()),
            ],
        )?,
        ShareTarget::Telegram => Url::parse_with_params(
            TELEGRAM_SHARE_ENDPOINT,
            [("url", page_url), ("text", text.as_str())],
        )?,
        ShareTarget::WhatsApp => {
            let message = format!("{text}\n\n{page_url}");
            Url::parse_with_params(WHATSAPP_SHARE_ENDPOINT, [("text", message.as_str())])?
        }
        ShareTarget::Facebook => Url::parse_with_params(
            FACEBOOK_SHARE_ENDPOINT,
            [("u", page_url), ("quote", text.as_str())],
        )?,
    };
    Ok(Some(link))
}

#[cfg(test)]
mod tests {
    use super::{share_link, ShareTarget};
    use crate::model::task::{Task, TaskId};
    use crate::share::dispatch::ShareError;

    const PAGE: &str = "https://taskbox.app/list?x=1";

    fn task() -> Task {
        Task {
            id: TaskId::from("1"),
            title: "Pay & file".to_string(),
            description: "50% <now>".to_string(),
        }
    }

    fn param(link: &url::Url, name: &str) -> String {
        link.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| panic!("missing query param {name}"))
    }

    #[test]
    fn clipboard_has_no_link() {
        assert_eq!(share_link(ShareTarget::Clipboard, &task(), PAGE).unwrap(), None);
    }

    #[test]
    fn telegram_link_round_trips_parameters() {
        let link = share_link(ShareTarget::Telegram, &task(), PAGE).unwrap().unwrap();
        assert_eq!(link.host_str(), Some("t.me"));
        assert_eq!(link.path(), "/share/url");
        assert_eq!(param(&link, "url"), PAGE);
        assert_eq!(param(&link, "text"), "Task Pay & file\nDescription 50% <now>");
    }

    #[test]
    fn vk_link_carries_title_separately() {
        let link = share_link(ShareTarget::Vk, &task(), PAGE).unwrap().unwrap();
        assert_eq!(param(&link, "title"), "Pay & file");
        assert_eq!(param(&link, "url"), PAGE);
    }

    #[test]
    fn whatsapp_link_appends_page_after_blank_line() {
        let link = share_link(ShareTarget::WhatsApp, &task(), PAGE).unwrap().unwrap();
        assert_eq!(
            param(&link, "text"),
            format!("Task Pay & file\nDescription 50% <now>\n\n{PAGE}")
        );
    }

    #[test]
    fn facebook_link_uses_u_and_quote() {
        let link = share_link(ShareTarget::Facebook, &task(), PAGE).unwrap().unwrap();
        assert_eq!(param(&link, "u"), PAGE);
        assert!(param(&link, "quote").starts_with("Task Pay & file"));
    }

    #[test]
    fn raw_user_content_never_appears_in_query() {
        for target in ShareTarget::ALL.into_iter().filter(|target| target.is_link()) {
            let link = share_link(target, &task(), PAGE).unwrap().unwrap();
            let query = link.query().unwrap_or_default();
            assert!(!query.contains("Pay & file"), "{target}: {query}");
            assert!(!query.contains('<'), "{target}: {query}");
            assert!(!query.contains('\n'), "{target}: {query}");
        }
    }

    #[test]
    fn relative_page_url_is_a_link_error() {
        let err = share_link(ShareTarget::Telegram, &task(), "tasks/list").unwrap_err();
        assert!(matches!(err, ShareError::Link(url::ParseError::RelativeUrlWithoutBase)));

        assert_eq!(share_link(ShareTarget::Clipboard, &task(), "tasks/list").unwrap(), None);
    }

    #[test]
    fn parse_accepts_known_names() {
        assert_eq!(ShareTarget::parse("Copy"), Some(ShareTarget::Clipboard));
        assert_eq!(ShareTarget::parse("whatsapp"), Some(ShareTarget::WhatsApp));
        assert_eq!(ShareTarget::parse("mail"), None);
    }
}
