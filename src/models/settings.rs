use serde::{Deserialize, Serialize};

use crate::models::{
    bundle::Bundle,
    user_info::{UserInfo, keys},
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Partial settings update pushed to the conference UI when a user joins.
/// Only the Some(...) fields are updated, None are ignored.
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "avatarURL", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(rename = "friendAvatarURL", skip_serializing_if = "Option::is_none")]
    pub friend_avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friend_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_host: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_voice_mode: Option<bool>,
}

impl SettingsUpdate {
    /// Merges this update into `settings`, leaving the keys it doesn't carry untouched.
    pub fn apply_to(&self, settings: &mut Bundle) {
        let strings = [
            (keys::DISPLAY_NAME, &self.display_name),
            (keys::EMAIL, &self.email),
            (keys::AVATAR_URL, &self.avatar_url),
            (keys::FRIEND_AVATAR_URL, &self.friend_avatar_url),
            (keys::FRIEND_NAME, &self.friend_name),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                settings.put_string(key, value.as_str());
            }
        }

        if let Some(is_host) = self.is_host {
            settings.put_bool(keys::IS_HOST, is_host);
        }
        if let Some(is_voice_mode) = self.is_voice_mode {
            settings.put_bool(keys::IS_VOICE_MODE, is_voice_mode);
        }
    }
}

impl From<&UserInfo> for SettingsUpdate {
    fn from(info: &UserInfo) -> Self {
        Self {
            display_name: info.display_name().map(str::to_owned),
            email: info.email().map(str::to_owned),
            avatar_url: info.avatar_url().map(str::to_owned),
            friend_avatar_url: info.friend_avatar_url().map(str::to_owned),
            friend_name: info.friend_name().map(str::to_owned),
            // Flags always carry a value on the user info side.
            is_host: Some(info.is_host()),
            is_voice_mode: Some(info.is_voice_mode()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bundle::BundleValue;

    #[test]
    fn test_update_from_user_info() {
        let mut info = UserInfo::new();
        info.set_display_name(Some("Alice".to_owned()));
        info.set_is_voice_mode(true);

        let update = SettingsUpdate::from(&info);
        let json = serde_json::to_string(&update).unwrap();

        assert_eq!(
            json,
            r#"{"displayName":"Alice","isHost":false,"isVoiceMode":true}"#
        );
    }

    #[test]
    fn test_apply_only_overwrites_carried_keys() {
        let mut settings = Bundle::new();
        settings.put_string(keys::DISPLAY_NAME, "Old name");
        settings.put_string(keys::EMAIL, "old@example.com");
        settings.put_bool("startAudioOnly", true);

        let update = SettingsUpdate {
            display_name: Some("Alice".to_owned()),
            is_host: Some(true),
            ..Default::default()
        };
        update.apply_to(&mut settings);

        assert_eq!(settings.get_string(keys::DISPLAY_NAME).unwrap(), Some("Alice"));
        assert_eq!(
            settings.get_string(keys::EMAIL).unwrap(),
            Some("old@example.com")
        );
        assert_eq!(settings.get_bool(keys::IS_HOST).unwrap(), Some(true));
        assert_eq!(settings.get("startAudioOnly"), Some(&BundleValue::Bool(true)));
        assert!(!settings.contains_key(keys::IS_VOICE_MODE));
    }

    #[test]
    fn test_applied_update_reads_back_as_user_info() {
        let mut info = UserInfo::new();
        info.set_friend_name(Some("Bob".to_owned()));
        info.set_avatar(url::Url::parse("https://example.com/b.png").ok());
        info.set_is_host(true);

        let mut settings = Bundle::new();
        SettingsUpdate::from(&info).apply_to(&mut settings);

        assert_eq!(UserInfo::from_bundle(&settings).unwrap(), info);
    }

    #[test]
    fn test_deserialize_partial_update() {
        let update: SettingsUpdate =
            serde_json::from_str(r#"{"avatarURL":"https://example.com/c.png"}"#).unwrap();

        assert_eq!(update.avatar_url.as_deref(), Some("https://example.com/c.png"));
        assert_eq!(update.is_host, None);
    }
}
