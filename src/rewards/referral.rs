//! Referral deep links and the share-to-chat URL.
use reqwest::Url;

const SHARE_ENDPOINT: &str = "https://t.me/share/url";

pub fn referral_link(bot_username: &str, user_id: i64) -> String {
    format!("https://t.me/{}?start=ref_{}", bot_username, user_id)
}

pub fn share_message(link: &str) -> String {
    format!(
        "🚀 Join TONTap and earn TON cryptocurrency!\n\n💰 Watch ads, complete tasks, get rewards!\n🎯 Daily bonuses and fast withdrawals\n\n👉 {}",
        link
    )
}

/// Builds the share sheet URL with `url` and `text` query-encoded.
pub fn share_url(link: &str) -> Option<Url> {
    Url::parse_with_params(
        SHARE_ENDPOINT,
        &[("url", link), ("text", share_message(link).as_str())],
    )
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_embeds_user_id() {
        assert_eq!(
            referral_link("YourBot", 123_456),
            "https://t.me/YourBot?start=ref_123456"
        );
    }

    #[test]
    fn share_url_encodes_link_and_message() {
        let link = referral_link("YourBot", 42);
        let url = share_url(&link).expect("share endpoint is a valid url");

        assert_eq!(url.host_str(), Some("t.me"));
        assert_eq!(url.path(), "/share/url");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("url".to_string(), link.clone()));
        assert_eq!(pairs[1].0, "text");
        assert!(pairs[1].1.ends_with(&link));
        assert!(!url.as_str().contains('\n'));
    }
}
