//! Enumerations shared by services and the schema

use async_graphql::Enum;
use graph_store::Label;

#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[graphql(rename_items = "lowercase")]
pub enum Emotion {
    Funny,
    Happy,
    Surprised,
    Cry,
    Angry,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Funny => "funny",
            Emotion::Happy => "happy",
            Emotion::Surprised => "surprised",
            Emotion::Cry => "cry",
            Emotion::Angry => "angry",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "funny" => Some(Emotion::Funny),
            "happy" => Some(Emotion::Happy),
            "surprised" => Some(Emotion::Surprised),
            "cry" => Some(Emotion::Cry),
            "angry" => Some(Emotion::Angry),
            _ => None,
        }
    }
}

/// Resources a user may have soft-deleted along with their account
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[graphql(rename_items = "PascalCase")]
pub enum Deletable {
    Post,
    Comment,
}

/// Resource kinds moderation and reports can act on
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[graphql(rename_items = "PascalCase")]
pub enum ResourceKind {
    User,
    Post,
    Comment,
}

impl ResourceKind {
    pub fn from_label(label: Label) -> Option<Self> {
        match label {
            Label::User => Some(ResourceKind::User),
            Label::Post => Some(ResourceKind::Post),
            Label::Comment => Some(ResourceKind::Comment),
            Label::Category | Label::Tag => None,
        }
    }
}

/// Node types that can be followed
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "FollowTypeEnum", rename_items = "PascalCase")]
pub enum FollowType {
    User,
}

impl FollowType {
    pub fn label(&self) -> Label {
        match self {
            FollowType::User => Label::User,
        }
    }
}

/// Node types that can be shouted
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
#[graphql(name = "ShoutTypeEnum", rename_items = "PascalCase")]
pub enum ShoutType {
    Post,
}

impl ShoutType {
    pub fn label(&self) -> Label {
        match self {
            ShoutType::Post => Label::Post,
        }
    }
}
