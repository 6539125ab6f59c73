//! SNSプラットフォーム定義
//!
//! Wikidata QIDとプラットフォーム表示名、チャート色の固定対応表を提供します。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 集計対象のSNSプラットフォーム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    TikTok,
    Facebook,
    Snapchat,
    Youtube,
    Twitch,
    Twitter,
    WhatsApp,
}

/// QID → プラットフォームの固定対応表
const QID_TABLE: [(&str, Platform); 8] = [
    ("Q209330", Platform::Instagram),
    ("Q48938223", Platform::TikTok),
    ("Q355", Platform::Facebook),
    ("Q170726", Platform::Snapchat),
    ("Q866", Platform::Youtube),
    ("Q4555537", Platform::Twitch),
    ("Q918", Platform::Twitter),
    ("Q1049511", Platform::WhatsApp),
];

impl Platform {
    /// 既知の全プラットフォーム（QID表の順）
    pub const ALL: [Platform; 8] = [
        Platform::Instagram,
        Platform::TikTok,
        Platform::Facebook,
        Platform::Snapchat,
        Platform::Youtube,
        Platform::Twitch,
        Platform::Twitter,
        Platform::WhatsApp,
    ];

    /// QIDからプラットフォームを引く。未知のQIDは`None`
    pub fn from_qid(qid: &str) -> Option<Self> {
        let qid = qid.trim();
        QID_TABLE
            .iter()
            .find(|(code, _)| *code == qid)
            .map(|(_, platform)| *platform)
    }

    /// 対応するWikidata QID
    pub fn qid(&self) -> &'static str {
        QID_TABLE
            .iter()
            .find(|(_, platform)| platform == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }

    /// 表示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Facebook => "Facebook",
            Platform::Snapchat => "Snapchat",
            Platform::Youtube => "Youtube",
            Platform::Twitch => "Twitch",
            Platform::Twitter => "Twitter",
            Platform::WhatsApp => "WhatsApp",
        }
    }

    /// 折れ線グラフの系列色（#RRGGBB）
    pub fn chart_color(&self) -> &'static str {
        match self {
            Platform::Instagram => "#E193ED",
            Platform::TikTok => "#D92076",
            Platform::Youtube => "#FF0000",
            Platform::Facebook => "#156EC8",
            Platform::Twitter => "#33C6EF",
            Platform::Twitch => "#8133EF",
            Platform::Snapchat => "#FFFF00",
            Platform::WhatsApp => "#008000",
        }
    }

    /// 表示名から系列色を引く。固定色のない名前は`None`
    pub fn color_for_name(name: &str) -> Option<&'static str> {
        name.parse::<Platform>().ok().map(|p| p.chart_color())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 不明なプラットフォーム名
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Platform::ALL
            .iter()
            .copied()
            .find(|p| p.display_name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
