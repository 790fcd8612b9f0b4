//! Media link payloads and the linking capability shared by all of them.
//!
//! A media construct can reach the event stream in two shapes: as a native call
//! whose arguments are positional ([`InternalMedia`]), or as a component call
//! whose options are keyed [`Attributes`]. Code that only needs to change how a
//! media is linked works through the [`Linking`] trait and does not care which
//! shape it holds.

use crate::ir::events::Attributes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Attribute key of the linking mode on component media calls.
pub const LINKING_ATTRIBUTE: &str = "linking";

/// Position of the linking value in a native media call's argument list.
pub const LINKING_ARGUMENT_INDEX: usize = 6;

/// How a rendered media is wrapped in a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkingMode {
    /// Link straight to the media file.
    #[default]
    #[serde(rename = "direct")]
    Direct,
    /// Render the media without any link.
    #[serde(rename = "nolink")]
    NoLink,
    /// Link to the media detail page.
    #[serde(rename = "details")]
    Details,
    /// Render only a link, no media.
    #[serde(rename = "linkonly")]
    LinkOnly,
}

impl LinkingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkingMode::Direct => "direct",
            LinkingMode::NoLink => "nolink",
            LinkingMode::Details => "details",
            LinkingMode::LinkOnly => "linkonly",
        }
    }
}

impl fmt::Display for LinkingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the four linking values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown linking mode '{0}'")]
pub struct UnknownLinkingMode(pub String);

impl FromStr for LinkingMode {
    type Err = UnknownLinkingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(LinkingMode::Direct),
            "nolink" => Ok(LinkingMode::NoLink),
            "details" => Ok(LinkingMode::Details),
            "linkonly" => Ok(LinkingMode::LinkOnly),
            _ => Err(UnknownLinkingMode(s.to_string())),
        }
    }
}

/// Capability of anything that carries a media linking mode.
pub trait Linking {
    /// Current mode, `None` when unset or not recognized.
    fn linking(&self) -> Option<LinkingMode>;

    fn set_linking(&mut self, mode: LinkingMode);

    /// Render without a link. Applying it twice changes nothing.
    fn disable_linking(&mut self) {
        self.set_linking(LinkingMode::NoLink);
    }
}

impl Linking for Attributes {
    fn linking(&self) -> Option<LinkingMode> {
        self.get(LINKING_ATTRIBUTE)?.parse().ok()
    }

    fn set_linking(&mut self, mode: LinkingMode) {
        self.insert(LINKING_ATTRIBUTE, mode.as_str());
    }
}

/// Positional arguments of a native media call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalMedia {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<String>,
    #[serde(default)]
    pub linking: LinkingMode,
}

impl InternalMedia {
    pub fn new(src: impl Into<String>) -> Self {
        InternalMedia {
            src: src.into(),
            ..Default::default()
        }
    }

    /// Builds the payload from a native call's argument list.
    ///
    /// The order is `src, title, align, width, height, cache, linking`. Missing
    /// or empty trailing values stay unset; an unknown linking value falls back
    /// to [`LinkingMode::Direct`].
    pub fn from_arguments<S: AsRef<str>>(arguments: &[S]) -> Self {
        let value = |index: usize| {
            arguments
                .get(index)
                .map(|arg| arg.as_ref().trim())
                .filter(|arg| !arg.is_empty())
                .map(str::to_string)
        };

        InternalMedia {
            src: value(0).unwrap_or_default(),
            title: value(1),
            align: value(2),
            width: value(3),
            height: value(4),
            cache: value(5),
            linking: value(LINKING_ARGUMENT_INDEX)
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Inverse of [`InternalMedia::from_arguments`].
    pub fn to_arguments(&self) -> Vec<String> {
        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        vec![
            self.src.clone(),
            optional(&self.title),
            optional(&self.align),
            optional(&self.width),
            optional(&self.height),
            optional(&self.cache),
            self.linking.as_str().to_string(),
        ]
    }
}

impl Linking for InternalMedia {
    fn linking(&self) -> Option<LinkingMode> {
        Some(self.linking)
    }

    fn set_linking(&mut self, mode: LinkingMode) {
        self.linking = mode;
    }
}
