//! Twitch API response types.
//!
//! Models the JSON structures returned by the three upstream endpoints the
//! service consumes: the unauthenticated chatters roster, the Helix `users`
//! lookup, and the legacy v5 `channels` detail object.

use serde::Deserialize;

/// Wire shape of the chatters roster endpoint: the role lists are nested
/// under a `"chatters"` key next to the total count.
#[derive(Debug, Deserialize)]
pub(crate) struct ChattersResponse {
    #[serde(default)]
    pub chatter_count: u64,
    pub chatters: RosterBuckets,
}

/// The per-role username lists inside a [`ChattersResponse`].
///
/// Every list defaults to empty — the endpoint omits buckets with no members.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RosterBuckets {
    #[serde(default)]
    pub vips: Vec<String>,
    #[serde(default)]
    pub moderators: Vec<String>,
    #[serde(default)]
    pub staff: Vec<String>,
    #[serde(default)]
    pub admins: Vec<String>,
    #[serde(default)]
    pub viewers: Vec<String>,
}

/// The current chat roster of a channel, flattened out of the wire envelope.
///
/// Immutable snapshot taken once per pipeline run. A username may appear in
/// more than one role list; no deduplication is applied.
#[derive(Debug, Clone)]
pub struct ChatRoster {
    pub chatter_count: u64,
    pub vips: Vec<String>,
    pub moderators: Vec<String>,
    pub staff: Vec<String>,
    pub admins: Vec<String>,
    pub viewers: Vec<String>,
}

impl ChatRoster {
    /// All usernames across every role bucket, in bucket order.
    ///
    /// Duplicates across buckets are preserved; the order within the result
    /// carries no guarantee beyond being stable for a given roster.
    #[must_use]
    pub fn usernames(&self) -> Vec<String> {
        let mut all = Vec::with_capacity(
            self.vips.len()
                + self.moderators.len()
                + self.staff.len()
                + self.admins.len()
                + self.viewers.len(),
        );
        all.extend_from_slice(&self.vips);
        all.extend_from_slice(&self.moderators);
        all.extend_from_slice(&self.staff);
        all.extend_from_slice(&self.admins);
        all.extend_from_slice(&self.viewers);
        all
    }
}

impl From<ChattersResponse> for ChatRoster {
    fn from(raw: ChattersResponse) -> Self {
        let RosterBuckets {
            vips,
            moderators,
            staff,
            admins,
            viewers,
        } = raw.chatters;
        Self {
            chatter_count: raw.chatter_count,
            vips,
            moderators,
            staff,
            admins,
            viewers,
        }
    }
}

/// Envelope of the Helix `users` endpoint: `{ "data": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub(crate) struct HelixUsersResponse {
    pub data: Vec<HelixUser>,
}

/// One resolved account from the Helix `users` endpoint.
///
/// Logins that do not resolve (deleted accounts) are simply absent from the
/// response — there is no per-login error entry.
#[derive(Debug, Clone, Deserialize)]
pub struct HelixUser {
    pub id: String,
    pub login: String,
    #[serde(default)]
    pub display_name: String,
}

/// Channel detail from the legacy v5 `channels` endpoint.
///
/// Only the fields the service projects are modeled; the endpoint returns
/// many more. Field names follow the legacy wire format (`_id`, `partner`,
/// `logo`, `profile_banner`).
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub display_name: String,
    pub name: String,
    #[serde(default)]
    pub partner: bool,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub profile_banner: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_flattens_wire_envelope() {
        let raw: ChattersResponse = serde_json::from_value(serde_json::json!({
            "chatter_count": 3,
            "chatters": {
                "vips": ["vip_one"],
                "moderators": ["mod_one"],
                "viewers": ["viewer_one"]
            }
        }))
        .expect("roster should deserialize");

        let roster = ChatRoster::from(raw);
        assert_eq!(roster.chatter_count, 3);
        assert_eq!(
            roster.usernames(),
            vec!["vip_one", "mod_one", "viewer_one"],
            "usernames should concatenate buckets in order"
        );
        assert!(roster.staff.is_empty(), "missing buckets default to empty");
    }

    #[test]
    fn roster_preserves_duplicates_across_buckets() {
        let raw: ChattersResponse = serde_json::from_value(serde_json::json!({
            "chatter_count": 2,
            "chatters": {
                "vips": ["same_user"],
                "moderators": ["same_user"]
            }
        }))
        .expect("roster should deserialize");

        let roster = ChatRoster::from(raw);
        assert_eq!(roster.usernames(), vec!["same_user", "same_user"]);
    }

    #[test]
    fn channel_detail_reads_legacy_field_names() {
        let detail: ChannelDetail = serde_json::from_value(serde_json::json!({
            "_id": "44322889",
            "display_name": "Dallas",
            "name": "dallas",
            "partner": true,
            "logo": "https://static-cdn.jtvnw.net/jtv_user_pictures/dallas.png",
            "profile_banner": null,
            "url": "https://www.twitch.tv/dallas",
            "followers": 2084,
            "views": 203,
            "description": "Just a gamer."
        }))
        .expect("channel detail should deserialize");

        assert_eq!(detail.id, "44322889");
        assert_eq!(detail.followers, 2084);
        assert!(detail.partner);
        assert!(detail.profile_banner.is_none());
    }

    #[test]
    fn channel_detail_tolerates_missing_optional_fields() {
        let detail: ChannelDetail = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "display_name": "Sparse",
            "name": "sparse"
        }))
        .expect("sparse channel detail should deserialize");

        assert_eq!(detail.followers, 0);
        assert!(!detail.partner);
        assert!(detail.logo.is_none());
    }
}
