use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{Error, Result, models::bundle::Bundle};

/// Bundle keys understood by [`UserInfo`].
pub mod keys {
    pub const DISPLAY_NAME: &str = "displayName";
    pub const EMAIL: &str = "email";
    pub const AVATAR_URL: &str = "avatarURL";
    pub const FRIEND_AVATAR_URL: &str = "friendAvatarURL";
    pub const FRIEND_NAME: &str = "friendName";
    pub const IS_HOST: &str = "isHost";
    pub const IS_VOICE_MODE: &str = "isVoiceMode";
}

/// An accepted avatar: the parsed URL plus the exact string the host sent.
#[derive(Debug, Clone, PartialEq)]
struct Avatar {
    url: Url,
    raw: String,
}

impl From<Url> for Avatar {
    fn from(url: Url) -> Self {
        let raw = url.to_string();
        Self { url, raw }
    }
}

/// Identity and display information about the local participant, handed to the
/// conferencing component once when joining.
///
/// Every field is optional; flags default to `false`. The value is not meant to be
/// shared between threads while being mutated, wrap it in a lock if you need to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Bundle", into = "Bundle")]
pub struct UserInfo {
    display_name: Option<String>,
    /// Used by collaborators as the gravatar fallback when no avatar is set.
    email: Option<String>,
    /// Always a valid http(s) URL; malformed input never gets here.
    avatar: Option<Avatar>,
    /// Kept as the raw string the host sent, it is never parsed.
    friend_avatar_url: Option<String>,
    is_voice_mode: bool,
    is_host: bool,
    friend_name: Option<String>,
}

impl UserInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the user info from the keys present in `bundle`.
    ///
    /// An `avatarURL` that does not parse as an http(s) URL is dropped and leaves the
    /// avatar unset.
    /// A recognized key holding a value of the wrong type is an error.
    pub fn from_bundle(bundle: &Bundle) -> Result<Self> {
        Ok(Self {
            display_name: bundle.get_string(keys::DISPLAY_NAME)?.map(str::to_owned),
            email: bundle.get_string(keys::EMAIL)?.map(str::to_owned),
            avatar: bundle
                .get_string(keys::AVATAR_URL)?
                .and_then(parse_avatar_url),
            friend_avatar_url: bundle
                .get_string(keys::FRIEND_AVATAR_URL)?
                .map(str::to_owned),
            is_voice_mode: bundle.get_bool(keys::IS_VOICE_MODE)?.unwrap_or_default(),
            is_host: bundle.get_bool(keys::IS_HOST)?.unwrap_or_default(),
            friend_name: bundle.get_string(keys::FRIEND_NAME)?.map(str::to_owned),
        })
    }

    /// Returns the bundle form: unset optional fields are omitted, both flags are always present.
    pub fn to_bundle(&self) -> Bundle {
        let mut bundle = Bundle::new();

        if let Some(display_name) = &self.display_name {
            bundle.put_string(keys::DISPLAY_NAME, display_name.as_str());
        }
        if let Some(email) = &self.email {
            bundle.put_string(keys::EMAIL, email.as_str());
        }
        if let Some(avatar) = &self.avatar {
            bundle.put_string(keys::AVATAR_URL, avatar.raw.as_str());
        }
        if let Some(friend_avatar_url) = &self.friend_avatar_url {
            bundle.put_string(keys::FRIEND_AVATAR_URL, friend_avatar_url.as_str());
        }
        if let Some(friend_name) = &self.friend_name {
            bundle.put_string(keys::FRIEND_NAME, friend_name.as_str());
        }

        bundle.put_bool(keys::IS_HOST, self.is_host);
        bundle.put_bool(keys::IS_VOICE_MODE, self.is_voice_mode);

        bundle
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn avatar(&self) -> Option<&Url> {
        self.avatar.as_ref().map(|avatar| &avatar.url)
    }

    /// The avatar URL as the host spelled it, which is what goes back into the bundle.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar.as_ref().map(|avatar| avatar.raw.as_str())
    }

    pub fn set_avatar(&mut self, avatar: Option<Url>) {
        self.avatar = avatar.map(Avatar::from);
    }

    pub fn friend_avatar_url(&self) -> Option<&str> {
        self.friend_avatar_url.as_deref()
    }

    pub fn set_friend_avatar_url(&mut self, friend_avatar_url: Option<String>) {
        self.friend_avatar_url = friend_avatar_url;
    }

    pub fn friend_name(&self) -> Option<&str> {
        self.friend_name.as_deref()
    }

    pub fn set_friend_name(&mut self, friend_name: Option<String>) {
        self.friend_name = friend_name;
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    pub fn set_is_host(&mut self, is_host: bool) {
        self.is_host = is_host;
    }

    pub fn is_voice_mode(&self) -> bool {
        self.is_voice_mode
    }

    pub fn set_is_voice_mode(&mut self, is_voice_mode: bool) {
        self.is_voice_mode = is_voice_mode;
    }

    /// Returns the name to show for this user, using the email as a fallback.
    pub fn displayable_name(&self) -> Option<&str> {
        if let Some(name) = self.display_name.as_deref()
            && !name.is_empty()
        {
            return Some(name);
        }
        self.email.as_deref().filter(|email| !email.is_empty())
    }

    /// The caption rendered under the large participant view.
    ///
    /// While the call is still ringing (`participants == 1`) only the host sees the
    /// friend's name. Once someone joined, every user sees it.
    pub fn stage_caption(&self, participants: usize) -> Option<&str> {
        match participants {
            0 => None,
            1 if !self.is_host => None,
            _ => self.friend_name.as_deref().filter(|name| !name.is_empty()),
        }
    }
}

fn parse_avatar_url(raw: &str) -> Option<Avatar> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(Avatar {
            url,
            raw: raw.to_owned(),
        }),
        Ok(url) => {
            debug!(
                "Ignoring avatar URL {raw:?} with unsupported scheme {}",
                url.scheme()
            );
            None
        }
        Err(e) => {
            debug!("Ignoring malformed avatar URL {raw:?}: {e}");
            None
        }
    }
}

impl TryFrom<&Bundle> for UserInfo {
    type Error = Error;

    fn try_from(bundle: &Bundle) -> Result<Self> {
        Self::from_bundle(bundle)
    }
}

impl TryFrom<Bundle> for UserInfo {
    type Error = Error;

    fn try_from(bundle: Bundle) -> Result<Self> {
        Self::from_bundle(&bundle)
    }
}

impl From<&UserInfo> for Bundle {
    fn from(info: &UserInfo) -> Self {
        info.to_bundle()
    }
}

impl From<UserInfo> for Bundle {
    fn from(info: UserInfo) -> Self {
        info.to_bundle()
    }
}
