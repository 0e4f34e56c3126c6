// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Community, FloorPlan, KITCHEN_FAUCET_PLACEHOLDER, LineItem, OptionsCatalog, TrimSelection,
    TrimsCatalog,
};

/// Everything a takeoff depends on. Borrowed so the deriver stays a pure function.
#[derive(Debug, Clone, Copy)]
pub struct TakeoffInputs<'a> {
    pub floor_plan: Option<&'a FloorPlan>,
    pub selected_options: &'a [String],
    pub options: &'a OptionsCatalog,
    pub trims: &'a TrimsCatalog,
    pub community: Option<&'a Community>,
    pub kitchen_faucet_model: &'a str,
    pub trim_models: Option<&'a TrimSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedTakeoff {
    pub plumbing: Vec<LineItem>,
    pub trim: Vec<LineItem>,
}

impl DerivedTakeoff {
    /// Model of the first kitchen-faucet fixture row in the trim list.
    pub fn kitchen_faucet_model(&self) -> Option<&str> {
        self.trim
            .iter()
            .filter(|item| item.is_kitchen_faucet())
            .find_map(LineItem::model)
    }
}

pub fn derive_takeoff(inputs: &TakeoffInputs<'_>) -> DerivedTakeoff {
    let (Some(floor_plan), Some(_community)) = (inputs.floor_plan, inputs.community) else {
        return DerivedTakeoff::default();
    };

    let mut plumbing = Vec::new();
    for item in &floor_plan.fixtures {
        push_merged(&mut plumbing, item);
    }

    let plan_options = inputs.options.get(&floor_plan.name);
    let mut seen: Vec<&str> = Vec::new();
    for option in inputs.selected_options {
        if seen.contains(&option.as_str()) {
            continue;
        }
        seen.push(option);
        let Some(items) = plan_options.and_then(|options| options.get(option)) else {
            tracing::debug!(plan = %floor_plan.name, %option, "option not in catalog; skipped");
            continue;
        };
        for item in items {
            push_merged(&mut plumbing, item);
        }
    }

    let faucet_model = inputs.kitchen_faucet_model.trim();
    if !faucet_model.is_empty() && faucet_model != KITCHEN_FAUCET_PLACEHOLDER {
        for item in &mut plumbing {
            if let LineItem::Fixture(fixture) = item
                && fixture.is_kitchen_faucet()
            {
                *fixture = fixture.with_model(faucet_model);
            }
        }
    }

    let trim = match inputs.trim_models {
        Some(selection) => selection.to_items(),
        None => inputs
            .trims
            .get(&floor_plan.name)
            .cloned()
            .unwrap_or_default(),
    };

    tracing::debug!(
        plan = %floor_plan.name,
        options = seen.len(),
        plumbing = plumbing.len(),
        trim = trim.len(),
        "derived takeoff"
    );
    DerivedTakeoff { plumbing, trim }
}

fn push_merged(items: &mut Vec<LineItem>, item: &LineItem) {
    if items.iter_mut().any(|existing| existing.absorb(item)) {
        return;
    }
    items.push(item.clone());
}
