// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::PathBuf;
use takeoff_app::{
    Builder, BuilderId, Community, CommunityId, FloorPlan, KITCHEN_FAUCET_MODELS, LineItem,
    PlanBundle, TakeoffItem,
};

const BUILDER_NAMES: [&str; 8] = [
    "Summit Homes",
    "Heritage Builders",
    "Greenleaf Residential",
    "Apex Custom Homes",
    "Eagle Crest Homes",
    "Hartley Construction",
    "Central Valley Homes",
    "Brookside Builders",
];

const COMMUNITY_NAMES: [&str; 10] = [
    "Cedar Ridge",
    "Willow Creek",
    "Maple Grove",
    "Juniper Hills",
    "Sunset Meadows",
    "Lakeview Estates",
    "Aspen Park",
    "Canyon Crossing",
    "Birch Hollow",
    "Northview",
];

const PLAN_NAMES: [&str; 8] = [
    "Aspen", "Birch", "Cypress", "Dogwood", "Elm", "Fir", "Hawthorn", "Magnolia",
];

const ROUGH_FIXTURES: [(&str, &str); 8] = [
    ("WH50", "Water Heater"),
    ("T100", "Toilet"),
    ("LAV18", "Lav Sink"),
    ("KS33", "Kitchen Sink"),
    ("TS60", "Tub/Shower Valve"),
    ("HB10", "Hose Bib"),
    ("IM20", "Ice Maker Box"),
    ("LB20", "Laundry Box"),
];

const OPTION_NAMES: [&str; 6] = [
    "Loft Bath",
    "Laundry Sink",
    "Wet Bar",
    "Garden Tub",
    "Outdoor Kitchen",
    "Second Water Heater",
];

const TRIM_FIXTURES: [(&str, &str); 5] = [
    ("6400", "Lav Faucet"),
    ("T2903", "Shower Trim"),
    ("T9000", "Tub Filler"),
    ("DN8000", "Towel Bar"),
    ("YB2824", "Paper Holder"),
];

/// Builders, communities and plan bundles in the JSON catalog file layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogFixture {
    pub builders: Vec<Builder>,
    pub communities: Vec<Community>,
    pub bundles: Vec<(BuilderId, CommunityId, PlanBundle)>,
}

impl CatalogFixture {
    pub fn bundle(&self, builder: BuilderId, community: CommunityId) -> Option<&PlanBundle> {
        self.bundles
            .iter()
            .find(|(b, c, _)| *b == builder && *c == community)
            .map(|(_, _, bundle)| bundle)
    }

    pub fn to_json(&self) -> Result<Value> {
        let mut bundles = Vec::with_capacity(self.bundles.len());
        for (builder, community, bundle) in &self.bundles {
            let mut record = serde_json::to_value(bundle).context("encode plan bundle")?;
            let object = record
                .as_object_mut()
                .ok_or_else(|| anyhow!("plan bundle did not encode as an object"))?;
            object.insert("builder_id".to_owned(), json!(builder.get()));
            object.insert("community_id".to_owned(), json!(community.get()));
            bundles.push(record);
        }

        Ok(json!({
            "builders": self.builders,
            "communities": self.communities,
            "bundles": bundles,
        }))
    }
}

/// The options catalog example: plan "PlanA" with one "Upgrade1" option.
pub fn sample_bundle(community: CommunityId) -> PlanBundle {
    PlanBundle {
        floor_plans: vec![FloorPlan {
            name: "PlanA".to_owned(),
            community_id: community,
            fixtures: vec![
                LineItem::fixture(1, "Kitchen Faucet", "Kitchen Faucet"),
                LineItem::fixture(2, "T100", "Toilet"),
            ],
        }],
        options: BTreeMap::from([(
            "PlanA".to_owned(),
            BTreeMap::from([(
                "Upgrade1".to_owned(),
                vec![LineItem::fixture(1, "WidgetX", "Sink")],
            )]),
        )]),
        trims: BTreeMap::from([(
            "PlanA".to_owned(),
            vec![
                LineItem::fixture(1, "7594C", "Kitchen Faucet"),
                LineItem::fixture(2, "6400", "Lav Faucet"),
            ],
        )]),
    }
}

/// Two builders; builder 1 owns communities 10 and 11, builder 2 owns 20.
pub fn sample_catalog() -> CatalogFixture {
    let builders = vec![
        Builder {
            id: BuilderId::new(1),
            name: "Summit Homes".to_owned(),
        },
        Builder {
            id: BuilderId::new(2),
            name: "Heritage Builders".to_owned(),
        },
    ];
    let communities = vec![
        community(10, "Cedar Ridge", 1),
        community(11, "Willow Creek", 1),
        community(20, "Maple Grove", 2),
    ];
    let bundles = vec![
        (
            BuilderId::new(1),
            CommunityId::new(10),
            sample_bundle(CommunityId::new(10)),
        ),
        (
            BuilderId::new(2),
            CommunityId::new(20),
            sample_bundle(CommunityId::new(20)),
        ),
    ];
    CatalogFixture {
        builders,
        communities,
        bundles,
    }
}

pub fn temp_catalog_path(fixture: &CatalogFixture) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("catalog.json");
    let body = serde_json::to_string_pretty(&fixture.to_json()?).context("encode catalog")?;
    std::fs::write(&path, body)
        .with_context(|| format!("write catalog fixture {}", path.display()))?;
    Ok((dir, path))
}

pub fn rough_fixture_names() -> impl Iterator<Item = &'static str> {
    ROUGH_FIXTURES.iter().map(|(_, name)| *name)
}

pub fn option_names() -> &'static [&'static str] {
    &OPTION_NAMES
}

fn community(id: i64, name: &str, builder: i64) -> Community {
    Community {
        id: CommunityId::new(id),
        name: name.to_owned(),
        builder_id: BuilderId::new(builder),
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Generates plausible catalogs from a seed; equal seeds give equal catalogs.
#[derive(Debug, Clone)]
pub struct TakeoffFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl TakeoffFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn catalog(&mut self, builder_count: usize) -> CatalogFixture {
        let mut fixture = CatalogFixture::default();
        let mut next_community = 100_i64;
        for index in 0..builder_count.min(BUILDER_NAMES.len()) {
            let builder = BuilderId::new(index as i64 + 1);
            fixture.builders.push(Builder {
                id: builder,
                name: BUILDER_NAMES[index].to_owned(),
            });

            for _ in 0..self.int_range(1, 3) {
                let id = CommunityId::new(next_community);
                next_community += 1;
                fixture.communities.push(Community {
                    id,
                    name: (*self.pick(&COMMUNITY_NAMES)).to_owned(),
                    builder_id: builder,
                });
                let bundle = self.plan_bundle(id);
                fixture.bundles.push((builder, id, bundle));
            }
        }
        fixture
    }

    pub fn plan_bundle(&mut self, community: CommunityId) -> PlanBundle {
        let mut bundle = PlanBundle::default();
        let plan_count = self.int_range(1, 4);
        let offset = self.rng.int_n(PLAN_NAMES.len());
        for index in 0..plan_count {
            let name = PLAN_NAMES[(offset + index) % PLAN_NAMES.len()].to_owned();
            let mut fixtures = vec![LineItem::fixture(1, "Kitchen Faucet", "Kitchen Faucet")];
            let rough_count = self.int_range(2, 5);
            fixtures.extend(self.rough_items(rough_count));

            let mut options = BTreeMap::new();
            for option in OPTION_NAMES {
                if self.rng.bool() {
                    let count = self.int_range(1, 2);
                    options.insert(option.to_owned(), self.rough_items(count));
                }
            }

            bundle.options.insert(name.clone(), options);
            bundle.trims.insert(name.clone(), self.trim_items());
            bundle.floor_plans.push(FloorPlan {
                name,
                community_id: community,
                fixtures,
            });
        }
        bundle
    }

    pub fn rough_items(&mut self, count: usize) -> Vec<LineItem> {
        (0..count)
            .map(|_| {
                let (model, name) = *self.pick(&ROUGH_FIXTURES);
                LineItem::Fixture(TakeoffItem::new(self.int_range(1, 3) as u32, model, name))
            })
            .collect()
    }

    pub fn trim_items(&mut self) -> Vec<LineItem> {
        let faucet = KITCHEN_FAUCET_MODELS[1 + self.rng.int_n(KITCHEN_FAUCET_MODELS.len() - 1)];
        let mut items = vec![LineItem::fixture(1, faucet, "Kitchen Faucet")];
        for (model, name) in TRIM_FIXTURES {
            if self.rng.bool() {
                items.push(LineItem::fixture(self.int_range(1, 3) as u32, model, name));
            }
        }
        items
    }

    fn int_range(&mut self, min: usize, max: usize) -> usize {
        min + self.rng.int_n(max - min + 1)
    }

    fn pick<'a, T>(&mut self, values: &'a [T]) -> &'a T {
        &values[self.rng.int_n(values.len())]
    }
}
