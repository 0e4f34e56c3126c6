// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use takeoff_app::{Builder, BuilderId, Community, CommunityId, PlanBundle};

use crate::CatalogSource;

/// An in-memory catalog, usually read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticCatalog {
    builders: Vec<Builder>,
    communities: Vec<Community>,
    bundles: BTreeMap<(BuilderId, CommunityId), PlanBundle>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    builders: Vec<Builder>,
    communities: Vec<Community>,
    #[serde(default)]
    bundles: Vec<BundleRecord>,
}

#[derive(Debug, Deserialize)]
struct BundleRecord {
    builder_id: BuilderId,
    community_id: CommunityId,
    #[serde(flatten)]
    bundle: PlanBundle,
}

impl StaticCatalog {
    pub fn new(builders: Vec<Builder>, communities: Vec<Community>) -> Self {
        Self {
            builders,
            communities,
            bundles: BTreeMap::new(),
        }
    }

    pub fn insert_bundle(&mut self, builder: BuilderId, community: CommunityId, bundle: PlanBundle) {
        self.bundles.insert((builder, community), bundle);
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read catalog file {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("load catalog file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw).context("parse catalog JSON")?;
        let mut catalog = Self::new(file.builders, file.communities);
        for record in file.bundles {
            let key = (record.builder_id, record.community_id);
            if catalog.bundles.insert(key, record.bundle).is_some() {
                bail!(
                    "duplicate plan bundle for builder {} community {}",
                    key.0,
                    key.1
                );
            }
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// A small built-in catalog for trying the tool without a catalog service.
    pub fn demo() -> Result<Self> {
        Self::from_json_str(DEMO_CATALOG).context("load built-in demo catalog")
    }

    fn validate(&self) -> Result<()> {
        for community in &self.communities {
            if !self
                .builders
                .iter()
                .any(|builder| builder.id == community.builder_id)
            {
                bail!(
                    "community {} ({}) references unknown builder {}",
                    community.id,
                    community.name,
                    community.builder_id
                );
            }
        }
        for (builder, community) in self.bundles.keys() {
            let owned = self
                .communities
                .iter()
                .any(|known| known.id == *community && known.builder_id == *builder);
            if !owned {
                bail!("plan bundle for builder {builder} names community {community} it does not own");
            }
        }
        Ok(())
    }
}

impl CatalogSource for StaticCatalog {
    fn list_builders(&self) -> Result<Vec<Builder>> {
        Ok(self.builders.clone())
    }

    fn list_communities(&self, builder: BuilderId) -> Result<Vec<Community>> {
        Ok(self
            .communities
            .iter()
            .filter(|community| community.builder_id == builder)
            .cloned()
            .collect())
    }

    fn load_plan_bundle(&self, builder: BuilderId, community: CommunityId) -> Result<PlanBundle> {
        self.bundles
            .get(&(builder, community))
            .cloned()
            .ok_or_else(|| anyhow!("no floor plans for builder {builder} community {community}"))
    }
}

const DEMO_CATALOG: &str = r#"{
  "builders": [
    { "id": 1, "name": "Summit Homes" },
    { "id": 2, "name": "Heritage Builders" }
  ],
  "communities": [
    { "id": 10, "name": "Cedar Ridge", "builder_id": 1 },
    { "id": 11, "name": "Willow Creek", "builder_id": 1 },
    { "id": 20, "name": "Maple Grove", "builder_id": 2 }
  ],
  "bundles": [
    {
      "builder_id": 1,
      "community_id": 10,
      "floor_plans": [
        {
          "name": "Aspen",
          "community_id": 10,
          "fixtures": [
            "1 - WH50 - Water Heater",
            "1 - Kitchen Faucet - Kitchen Faucet",
            "1 - KS33 - Kitchen Sink",
            "2 - T100 - Toilet",
            "2 - LAV18 - Lav Sink",
            "1 - TS60 - Tub/Shower Valve",
            "2 - HB10 - Hose Bib"
          ]
        },
        {
          "name": "Birch",
          "community_id": 10,
          "fixtures": [
            "1 - WH50 - Water Heater",
            "1 - Kitchen Faucet - Kitchen Faucet",
            "1 - KS33 - Kitchen Sink",
            "3 - T100 - Toilet",
            "4 - LAV18 - Lav Sink",
            "2 - TS60 - Tub/Shower Valve",
            "2 - HB10 - Hose Bib"
          ]
        }
      ],
      "options": {
        "Aspen": {
          "Loft Bath": ["1 - T100 - Toilet", "1 - LAV18 - Lav Sink", "1 - TS60 - Tub/Shower Valve"],
          "Laundry Sink": ["1 - LS24 - Laundry Sink"],
          "Ice Maker": ["1 - IM20 - Ice Maker Box"]
        },
        "Birch": {
          "Garden Tub": ["1 - GT66 - Garden Tub"],
          "Wet Bar": ["1 - BS15 - Bar Sink", "1 - 4903 - Bar Faucet"]
        }
      },
      "trims": {
        "Aspen": [
          "1 - 7594C - Kitchen Faucet",
          "2 - 6400 - Lav Faucet",
          "1 - T2903 - Shower Trim"
        ],
        "Birch": [
          "1 - 7185C - Kitchen Faucet",
          "4 - 6400 - Lav Faucet",
          "2 - T2903 - Shower Trim",
          "1 - T9000 - Tub Filler"
        ]
      }
    },
    {
      "builder_id": 2,
      "community_id": 20,
      "floor_plans": [
        {
          "name": "Magnolia",
          "community_id": 20,
          "fixtures": [
            "2 - WH50 - Water Heater",
            "1 - Kitchen Faucet - Kitchen Faucet",
            "1 - KS33 - Kitchen Sink",
            "3 - T100 - Toilet",
            "3 - LAV18 - Lav Sink"
          ]
        }
      ],
      "options": {
        "Magnolia": {
          "Outdoor Kitchen": ["1 - OK40 - Outdoor Sink", "1 - HB10 - Hose Bib"]
        }
      },
      "trims": {
        "Magnolia": [
          "1 - 7565SRS - Kitchen Faucet",
          "3 - 6400 - Lav Faucet"
        ]
      }
    }
  ]
}"#;
