// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::ids::*;

pub const KITCHEN_FAUCET_PLACEHOLDER: &str = "Kitchen Faucet";

pub const KITCHEN_FAUCET_MODELS: [&str; 30] = [
    KITCHEN_FAUCET_PLACEHOLDER,
    "7594C",
    "7594SRS",
    "7594BL",
    "7594ORB",
    "7185C",
    "7185SRS",
    "7185ORB",
    "7565",
    "7565SRS",
    "7565BL",
    "7565BG",
    "5923",
    "5923SRS",
    "5923BL",
    "5923BG",
    "S72308",
    "S72308SRS",
    "S72308BL",
    "S72308BG",
    "7295C",
    "7295SRS",
    "7295ORB",
    "7864",
    "7864SRS",
    "7864BL",
    "7864ORB",
    "7082",
    "67315C",
    "67315SRS",
];

/// Trim selection keys that describe the product line rather than a fixture.
pub const TRIM_ATTRIBUTE_KEYS: [&str; 3] = ["brand", "series", "finish"];

const FIELD_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ListKind {
    Plumbing,
    Trim,
}

impl ListKind {
    pub const ALL: [Self; 2] = [Self::Plumbing, Self::Trim];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plumbing => "plumbing",
            Self::Trim => "trim",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "plumbing" => Some(Self::Plumbing),
            "trim" => Some(Self::Trim),
            _ => None,
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Plumbing => "Plumbing Takeoff",
            Self::Trim => "Trim Takeoff",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Builder {
    pub id: BuilderId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: CommunityId,
    pub name: String,
    pub builder_id: BuilderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPlan {
    pub name: String,
    pub community_id: CommunityId,
    /// Fixtures every takeoff for this plan starts from.
    #[serde(default)]
    pub fixtures: Vec<LineItem>,
}

/// Floor-plan name to option name to the items that option adds.
pub type OptionsCatalog = BTreeMap<String, BTreeMap<String, Vec<LineItem>>>;

/// Floor-plan name to the default trim items for that plan.
pub type TrimsCatalog = BTreeMap<String, Vec<LineItem>>;

/// Everything the last pipeline stage loads for one builder and community.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanBundle {
    pub floor_plans: Vec<FloorPlan>,
    pub options: OptionsCatalog,
    pub trims: TrimsCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TakeoffItem {
    pub quantity: u32,
    pub model: String,
    pub name: String,
}

impl TakeoffItem {
    pub fn new(quantity: u32, model: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            quantity,
            model: model.into(),
            name: name.into(),
        }
    }

    /// Parses `"<quantity> - <model> - <name>"`. The name keeps any further
    /// separators. Only text that displays back byte-for-byte is accepted, so
    /// `"01 - A - Sink"` or padded fields stay free text.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, FIELD_SEPARATOR);
        let quantity_text = parts.next()?;
        let model = parts.next()?;
        let name = parts.next()?;
        let quantity: u32 = quantity_text.parse().ok()?;
        if quantity.to_string() != quantity_text
            || !Self::is_valid_model(model)
            || !is_trimmed_field(name)
        {
            return None;
        }
        Some(Self::new(quantity, model, name))
    }

    /// A model that can sit between separators and still parse back.
    pub fn is_valid_model(model: &str) -> bool {
        is_trimmed_field(model) && !model.contains(FIELD_SEPARATOR)
    }

    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_owned(),
            ..self.clone()
        }
    }

    pub fn is_kitchen_faucet(&self) -> bool {
        mentions_kitchen_faucet(&self.name) || mentions_kitchen_faucet(&self.model)
    }

    fn same_fixture(&self, other: &Self) -> bool {
        self.model == other.model && self.name == other.name
    }
}

impl fmt::Display for TakeoffItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.quantity, self.model, self.name
        )
    }
}

/// One row of a takeoff list: a structured fixture or free text typed by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineItem {
    Fixture(TakeoffItem),
    Custom(String),
}

impl LineItem {
    pub fn parse(raw: &str) -> Self {
        match TakeoffItem::parse(raw) {
            Some(item) => Self::Fixture(item),
            None => Self::Custom(raw.to_owned()),
        }
    }

    pub fn fixture(quantity: u32, model: &str, name: &str) -> Self {
        Self::Fixture(TakeoffItem::new(quantity, model, name))
    }

    pub fn as_fixture(&self) -> Option<&TakeoffItem> {
        match self {
            Self::Fixture(item) => Some(item),
            Self::Custom(_) => None,
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.as_fixture().map(|item| item.model.as_str())
    }

    pub fn is_kitchen_faucet(&self) -> bool {
        match self {
            Self::Fixture(item) => item.is_kitchen_faucet(),
            Self::Custom(text) => mentions_kitchen_faucet(text),
        }
    }

    /// Adds `other`'s quantity when both rows name the same model and fixture.
    pub(crate) fn absorb(&mut self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixture(mine), Self::Fixture(theirs)) if mine.same_fixture(theirs) => {
                mine.quantity = mine.quantity.saturating_add(theirs.quantity);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixture(item) => item.fmt(f),
            Self::Custom(text) => f.write_str(text),
        }
    }
}

impl From<String> for LineItem {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for LineItem {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<LineItem> for String {
    fn from(value: LineItem) -> Self {
        value.to_string()
    }
}

fn is_trimmed_field(text: &str) -> bool {
    !text.is_empty() && text.trim() == text
}

fn mentions_kitchen_faucet(text: &str) -> bool {
    text.to_ascii_lowercase().contains("kitchen faucet")
}

/// Ordered fixture-to-model choices; later inserts for the same key replace in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrimSelection {
    entries: Vec<(String, String)>,
}

impl TrimSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, model: impl Into<String>) {
        let key = key.into();
        let model = model.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = model,
            None => self.entries.push((key, model)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, model)| model.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, model)| (key.as_str(), model.as_str()))
    }

    pub fn fixtures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries()
            .filter(|(key, _)| !TRIM_ATTRIBUTE_KEYS.contains(key))
    }

    pub fn to_items(&self) -> Vec<LineItem> {
        self.fixtures()
            .map(|(fixture, model)| LineItem::fixture(1, model, fixture))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TrimSelection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut selection = Self::new();
        for (key, model) in iter {
            selection.insert(key, model);
        }
        selection
    }
}
