// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    Builder, BuilderId, Community, CommunityId, DEFAULT_HISTORY_LIMIT, DerivedTakeoff, FloorPlan,
    KITCHEN_FAUCET_PLACEHOLDER, LineItem, ListKind, ModelUpdate, PlanBundle, TakeoffInputs,
    TakeoffList, TrimSelection, derive_takeoff, format_list, format_takeoff,
};

/// One stage of the builder -> community -> plan bundle loading pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    Builders,
    Communities(BuilderId),
    PlanBundle {
        builder: BuilderId,
        community: CommunityId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStage {
    Builder,
    Community,
    FloorPlan,
    Options,
    TrimModels,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub builders: Vec<Builder>,
    pub communities: Vec<Community>,
    pub bundle: PlanBundle,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    pub builder: Option<BuilderId>,
    pub community: Option<CommunityId>,
    pub floor_plan: Option<String>,
    pub options: Vec<String>,
    pub trim_models: Option<TrimSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub catalog: Catalog,
    pub selection: Selection,
    pub kitchen_faucet_model: String,
    pub plumbing: TakeoffList,
    pub trim: TakeoffList,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Start,
    BuildersLoaded(Vec<Builder>),
    CommunitiesLoaded {
        builder: BuilderId,
        communities: Vec<Community>,
    },
    PlanBundleLoaded {
        builder: BuilderId,
        community: CommunityId,
        bundle: PlanBundle,
    },
    SelectBuilder(BuilderId),
    SelectCommunity(CommunityId),
    SelectFloorPlan(String),
    SetOptions(Vec<String>),
    ToggleOption(String),
    SelectTrimModels(TrimSelection),
    ClearTrimModels,
    RemoveItem {
        list: ListKind,
        index: usize,
    },
    MoveItem {
        list: ListKind,
        from: usize,
        to: usize,
    },
    AddCustomItem {
        list: ListKind,
        text: String,
    },
    SetFaucetModel {
        list: ListKind,
        index: usize,
        model: String,
    },
    Undo(ListKind),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FetchRequested(FetchRequest),
    StaleResponseDropped(FetchRequest),
    SelectionChanged(SelectionStage),
    ListChanged(ListKind),
    KitchenFaucetModelChanged(String),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            catalog: Catalog::default(),
            selection: Selection::default(),
            kitchen_faucet_model: KITCHEN_FAUCET_PLACEHOLDER.to_owned(),
            plumbing: TakeoffList::with_history_limit(limit),
            trim: TakeoffList::with_history_limit(limit),
            status_line: None,
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        tracing::trace!(?command, "dispatch");
        match command {
            AppCommand::Start => vec![AppEvent::FetchRequested(FetchRequest::Builders)],
            AppCommand::BuildersLoaded(builders) => {
                let count = builders.len();
                self.catalog.builders = builders;
                vec![self.set_status(format!("{count} builders loaded"))]
            }
            AppCommand::CommunitiesLoaded {
                builder,
                communities,
            } => {
                if self.selection.builder != Some(builder) {
                    return self.drop_stale(FetchRequest::Communities(builder));
                }
                self.catalog.communities = communities;
                let count = self.visible_communities().count();
                vec![self.set_status(format!("{count} communities loaded"))]
            }
            AppCommand::PlanBundleLoaded {
                builder,
                community,
                bundle,
            } => {
                if self.selection.builder != Some(builder)
                    || self.selection.community != Some(community)
                {
                    return self.drop_stale(FetchRequest::PlanBundle { builder, community });
                }
                self.load_bundle(bundle)
            }
            AppCommand::SelectBuilder(id) => self.select_builder(id),
            AppCommand::SelectCommunity(id) => self.select_community(id),
            AppCommand::SelectFloorPlan(name) => self.select_floor_plan(&name),
            AppCommand::SetOptions(names) => self.set_options(names),
            AppCommand::ToggleOption(name) => self.toggle_option(name),
            AppCommand::SelectTrimModels(selection) => {
                self.selection.trim_models = Some(selection);
                self.with_rederive(vec![AppEvent::SelectionChanged(SelectionStage::TrimModels)])
            }
            AppCommand::ClearTrimModels => {
                if self.selection.trim_models.take().is_none() {
                    return Vec::new();
                }
                self.with_rederive(vec![AppEvent::SelectionChanged(SelectionStage::TrimModels)])
            }
            AppCommand::RemoveItem { list, index } => match self.list_mut(list).remove(index) {
                Some(_) => vec![AppEvent::ListChanged(list)],
                None => vec![self.set_status(format!("no {} row {}", list.as_str(), index + 1))],
            },
            AppCommand::MoveItem { list, from, to } => {
                if self.list_mut(list).move_item(from, to) {
                    vec![AppEvent::ListChanged(list)]
                } else {
                    vec![self.set_status(format!(
                        "cannot move {} row {} to {}",
                        list.as_str(),
                        from + 1,
                        to + 1
                    ))]
                }
            }
            AppCommand::AddCustomItem { list, text } => {
                if self.list_mut(list).add_custom(&text) {
                    vec![AppEvent::ListChanged(list)]
                } else {
                    vec![self.set_status("custom item is empty")]
                }
            }
            AppCommand::SetFaucetModel { list, index, model } => {
                self.set_faucet_model(list, index, &model)
            }
            AppCommand::Undo(list) => {
                if self.list_mut(list).undo() {
                    vec![AppEvent::ListChanged(list)]
                } else {
                    vec![self.set_status(format!("nothing to undo in {}", list.as_str()))]
                }
            }
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn selected_builder(&self) -> Option<&Builder> {
        let id = self.selection.builder?;
        self.catalog.builders.iter().find(|builder| builder.id == id)
    }

    /// Communities belonging to the selected builder.
    pub fn visible_communities(&self) -> impl Iterator<Item = &Community> {
        let builder = self.selection.builder;
        self.catalog
            .communities
            .iter()
            .filter(move |community| Some(community.builder_id) == builder)
    }

    pub fn selected_community(&self) -> Option<&Community> {
        let id = self.selection.community?;
        self.visible_communities()
            .find(|community| community.id == id)
    }

    pub fn floor_plans(&self) -> &[FloorPlan] {
        &self.catalog.bundle.floor_plans
    }

    pub fn selected_floor_plan(&self) -> Option<&FloorPlan> {
        let name = self.selection.floor_plan.as_deref()?;
        self.floor_plans().iter().find(|plan| plan.name == name)
    }

    /// Option names offered for the selected floor plan, in catalog order.
    pub fn available_options(&self) -> Vec<&str> {
        self.selection
            .floor_plan
            .as_ref()
            .and_then(|name| self.catalog.bundle.options.get(name))
            .map(|options| options.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn list(&self, kind: ListKind) -> &TakeoffList {
        match kind {
            ListKind::Plumbing => &self.plumbing,
            ListKind::Trim => &self.trim,
        }
    }

    pub fn clipboard_text(&self, kind: Option<ListKind>) -> String {
        match kind {
            Some(kind) => format_list(self.list(kind).items()),
            None => format_takeoff(self.plumbing.items(), self.trim.items()),
        }
    }

    fn list_mut(&mut self, kind: ListKind) -> &mut TakeoffList {
        match kind {
            ListKind::Plumbing => &mut self.plumbing,
            ListKind::Trim => &mut self.trim,
        }
    }

    fn select_builder(&mut self, id: BuilderId) -> Vec<AppEvent> {
        if !self.catalog.builders.iter().any(|builder| builder.id == id) {
            return vec![self.set_status(format!("unknown builder {id}"))];
        }
        self.selection.builder = Some(id);
        self.selection.community = None;
        self.selection.floor_plan = None;
        self.selection.options.clear();
        self.catalog.communities.clear();
        self.catalog.bundle = PlanBundle::default();
        tracing::info!(builder = %id, "builder selected; loading communities");

        self.with_rederive(vec![
            AppEvent::SelectionChanged(SelectionStage::Builder),
            AppEvent::FetchRequested(FetchRequest::Communities(id)),
        ])
    }

    fn select_community(&mut self, id: CommunityId) -> Vec<AppEvent> {
        let Some(builder) = self.selection.builder else {
            return vec![self.set_status("select a builder first")];
        };
        if !self.visible_communities().any(|community| community.id == id) {
            return vec![self.set_status(format!("unknown community {id}"))];
        }
        self.selection.community = Some(id);
        self.selection.floor_plan = None;
        self.selection.options.clear();
        self.catalog.bundle = PlanBundle::default();
        tracing::info!(%builder, community = %id, "community selected; loading floor plans");

        self.with_rederive(vec![
            AppEvent::SelectionChanged(SelectionStage::Community),
            AppEvent::FetchRequested(FetchRequest::PlanBundle {
                builder,
                community: id,
            }),
        ])
    }

    fn load_bundle(&mut self, bundle: PlanBundle) -> Vec<AppEvent> {
        let plans = bundle.floor_plans.len();
        self.catalog.bundle = bundle;
        self.selection.floor_plan = self.floor_plans().first().map(|plan| plan.name.clone());
        self.selection.options.clear();
        let status = self.set_status(format!("{plans} floor plans loaded"));
        self.with_rederive(vec![
            AppEvent::SelectionChanged(SelectionStage::FloorPlan),
            status,
        ])
    }

    fn select_floor_plan(&mut self, name: &str) -> Vec<AppEvent> {
        if !self.floor_plans().iter().any(|plan| plan.name == name) {
            return vec![self.set_status(format!("unknown floor plan {name:?}"))];
        }
        self.selection.floor_plan = Some(name.to_owned());
        self.selection.options.clear();
        self.with_rederive(vec![AppEvent::SelectionChanged(SelectionStage::FloorPlan)])
    }

    fn set_options(&mut self, names: Vec<String>) -> Vec<AppEvent> {
        let available = self.available_options();
        let mut options: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !available.contains(&name.as_str()) {
                tracing::warn!(option = %name, "ignoring option not offered for this floor plan");
                continue;
            }
            if !options.contains(&name) {
                options.push(name);
            }
        }
        self.selection.options = options;
        self.with_rederive(vec![AppEvent::SelectionChanged(SelectionStage::Options)])
    }

    fn toggle_option(&mut self, name: String) -> Vec<AppEvent> {
        if !self.available_options().contains(&name.as_str()) {
            return vec![self.set_status(format!("unknown option {name:?}"))];
        }
        match self.selection.options.iter().position(|option| *option == name) {
            Some(index) => {
                self.selection.options.remove(index);
            }
            None => self.selection.options.push(name),
        }
        self.with_rederive(vec![AppEvent::SelectionChanged(SelectionStage::Options)])
    }

    fn set_faucet_model(&mut self, list: ListKind, index: usize, model: &str) -> Vec<AppEvent> {
        let is_kitchen_faucet = self
            .list(list)
            .get(index)
            .is_some_and(LineItem::is_kitchen_faucet);
        let model = model.trim();
        let update = self.list_mut(list).update_faucet_model(index, model);
        let mut events = match update {
            ModelUpdate::Changed => vec![AppEvent::ListChanged(list)],
            ModelUpdate::Unchanged => vec![self.set_status(format!(
                "{} row {} already uses {model}",
                list.as_str(),
                index + 1
            ))],
            ModelUpdate::Rejected => {
                return vec![self.set_status(format!(
                    "cannot set model on {} row {}",
                    list.as_str(),
                    index + 1
                ))];
            }
        };
        if is_kitchen_faucet && self.kitchen_faucet_model != model {
            self.kitchen_faucet_model = model.to_owned();
            events.push(AppEvent::KitchenFaucetModelChanged(model.to_owned()));
        }
        events
    }

    fn with_rederive(&mut self, mut events: Vec<AppEvent>) -> Vec<AppEvent> {
        events.extend(self.rederive());
        events
    }

    /// Re-runs the deriver. Without a plan and community both lists are reset,
    /// history included. A kitchen faucet found in the trim output becomes the
    /// tracked model for the next derivation, not this one.
    fn rederive(&mut self) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.selected_floor_plan().is_none() || self.selected_community().is_none() {
            for kind in ListKind::ALL {
                if self.list_mut(kind).reset() {
                    events.push(AppEvent::ListChanged(kind));
                }
            }
            return events;
        }

        let derived = self.derive();
        let detected = derived.kitchen_faucet_model().map(str::to_owned);
        if self.plumbing.replace(derived.plumbing) {
            events.push(AppEvent::ListChanged(ListKind::Plumbing));
        }
        if self.trim.replace(derived.trim) {
            events.push(AppEvent::ListChanged(ListKind::Trim));
        }
        if let Some(model) = detected
            && model != self.kitchen_faucet_model
        {
            tracing::debug!(%model, "tracking kitchen faucet model from trim");
            self.kitchen_faucet_model = model.clone();
            events.push(AppEvent::KitchenFaucetModelChanged(model));
        }
        events
    }

    fn derive(&self) -> DerivedTakeoff {
        derive_takeoff(&TakeoffInputs {
            floor_plan: self.selected_floor_plan(),
            selected_options: &self.selection.options,
            options: &self.catalog.bundle.options,
            trims: &self.catalog.bundle.trims,
            community: self.selected_community(),
            kitchen_faucet_model: &self.kitchen_faucet_model,
            trim_models: self.selection.trim_models.as_ref(),
        })
    }

    fn drop_stale(&mut self, request: FetchRequest) -> Vec<AppEvent> {
        tracing::warn!(?request, "dropping response for a superseded selection");
        vec![AppEvent::StaleResponseDropped(request)]
    }

    fn set_status(&mut self, message: impl Into<String>) -> AppEvent {
        let message = message.into();
        self.status_line = Some(message.clone());
        AppEvent::StatusUpdated(message)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, FetchRequest, SelectionStage};
    use crate::{
        Builder, BuilderId, Community, CommunityId, FloorPlan, LineItem, ListKind, PlanBundle,
        TrimSelection,
    };
    use std::collections::BTreeMap;

    fn builders() -> Vec<Builder> {
        vec![
            Builder {
                id: BuilderId::new(1),
                name: "Summit Homes".to_owned(),
            },
            Builder {
                id: BuilderId::new(2),
                name: "Heritage Builders".to_owned(),
            },
        ]
    }

    fn communities() -> Vec<Community> {
        vec![
            Community {
                id: CommunityId::new(10),
                name: "Cedar Ridge".to_owned(),
                builder_id: BuilderId::new(1),
            },
            Community {
                id: CommunityId::new(20),
                name: "Willow Creek".to_owned(),
                builder_id: BuilderId::new(2),
            },
        ]
    }

    fn bundle() -> PlanBundle {
        let plan = |name: &str, fixtures: &[&str]| FloorPlan {
            name: name.to_owned(),
            community_id: CommunityId::new(10),
            fixtures: fixtures.iter().map(|line| LineItem::parse(line)).collect(),
        };
        PlanBundle {
            floor_plans: vec![
                plan(
                    "PlanA",
                    &["1 - Kitchen Faucet - Kitchen Faucet", "2 - WidgetX - Sink"],
                ),
                plan("PlanB", &["1 - T100 - Toilet"]),
            ],
            options: BTreeMap::from([(
                "PlanA".to_owned(),
                BTreeMap::from([
                    (
                        "Upgrade1".to_owned(),
                        vec![LineItem::parse("1 - WidgetX - Sink")],
                    ),
                    (
                        "Laundry".to_owned(),
                        vec![LineItem::parse("1 - LB20 - Laundry Box")],
                    ),
                ]),
            )]),
            trims: BTreeMap::from([(
                "PlanA".to_owned(),
                vec![
                    LineItem::parse("1 - 7594C - Kitchen Faucet"),
                    LineItem::parse("2 - 6400 - Lav Faucet"),
                ],
            )]),
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.dispatch(AppCommand::BuildersLoaded(builders()));
        state.dispatch(AppCommand::SelectBuilder(BuilderId::new(1)));
        state.dispatch(AppCommand::CommunitiesLoaded {
            builder: BuilderId::new(1),
            communities: communities(),
        });
        state.dispatch(AppCommand::SelectCommunity(CommunityId::new(10)));
        state.dispatch(AppCommand::PlanBundleLoaded {
            builder: BuilderId::new(1),
            community: CommunityId::new(10),
            bundle: bundle(),
        });
        state
    }

    #[test]
    fn pipeline_requests_each_stage_in_order() {
        let mut state = AppState::default();
        assert_eq!(
            state.dispatch(AppCommand::Start),
            vec![AppEvent::FetchRequested(FetchRequest::Builders)]
        );

        state.dispatch(AppCommand::BuildersLoaded(builders()));
        let events = state.dispatch(AppCommand::SelectBuilder(BuilderId::new(1)));
        assert!(events.contains(&AppEvent::FetchRequested(FetchRequest::Communities(
            BuilderId::new(1)
        ))));

        state.dispatch(AppCommand::CommunitiesLoaded {
            builder: BuilderId::new(1),
            communities: communities(),
        });
        let events = state.dispatch(AppCommand::SelectCommunity(CommunityId::new(10)));
        assert!(events.contains(&AppEvent::FetchRequested(FetchRequest::PlanBundle {
            builder: BuilderId::new(1),
            community: CommunityId::new(10),
        })));
    }

    #[test]
    fn communities_are_filtered_to_selected_builder() {
        let state = loaded_state();
        let names: Vec<_> = state
            .visible_communities()
            .map(|community| community.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cedar Ridge"]);
    }

    #[test]
    fn community_of_other_builder_is_rejected() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::BuildersLoaded(builders()));
        state.dispatch(AppCommand::SelectBuilder(BuilderId::new(1)));
        state.dispatch(AppCommand::CommunitiesLoaded {
            builder: BuilderId::new(1),
            communities: communities(),
        });
        let events = state.dispatch(AppCommand::SelectCommunity(CommunityId::new(20)));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("unknown community 20".to_owned())]
        );
        assert_eq!(state.selection.community, None);
    }

    #[test]
    fn bundle_defaults_to_first_floor_plan_and_derives() {
        let state = loaded_state();
        assert_eq!(state.selection.floor_plan.as_deref(), Some("PlanA"));
        assert_eq!(
            state.plumbing.lines(),
            vec!["1 - Kitchen Faucet - Kitchen Faucet", "2 - WidgetX - Sink"]
        );
        assert_eq!(
            state.trim.lines(),
            vec!["1 - 7594C - Kitchen Faucet", "2 - 6400 - Lav Faucet"]
        );
        assert_eq!(state.kitchen_faucet_model, "7594C");
    }

    #[test]
    fn new_builder_clears_downstream_selection() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ToggleOption("Upgrade1".to_owned()));
        let events = state.dispatch(AppCommand::SelectBuilder(BuilderId::new(2)));

        assert_eq!(events[0], AppEvent::SelectionChanged(SelectionStage::Builder));
        assert_eq!(state.selection.community, None);
        assert_eq!(state.selection.floor_plan, None);
        assert!(state.selection.options.is_empty());
        assert!(state.floor_plans().is_empty());
        assert!(state.plumbing.is_empty());
        assert!(state.trim.is_empty());
    }

    #[test]
    fn undo_after_builder_change_does_not_restore_old_plan() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ToggleOption("Laundry".to_owned()));
        state.dispatch(AppCommand::SelectBuilder(BuilderId::new(2)));

        let events = state.dispatch(AppCommand::Undo(ListKind::Plumbing));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("nothing to undo in plumbing".to_owned())]
        );
        assert!(state.plumbing.is_empty());
        assert!(!state.trim.can_undo());
    }

    #[test]
    fn new_community_clears_floor_plan_and_options() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ToggleOption("Laundry".to_owned()));
        state.dispatch(AppCommand::SelectCommunity(CommunityId::new(10)));
        assert_eq!(state.selection.floor_plan, None);
        assert!(state.selection.options.is_empty());
        assert!(state.plumbing.is_empty());
    }

    #[test]
    fn stale_bundle_is_dropped() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::SelectBuilder(BuilderId::new(2)));
        let events = state.dispatch(AppCommand::PlanBundleLoaded {
            builder: BuilderId::new(1),
            community: CommunityId::new(10),
            bundle: bundle(),
        });
        assert_eq!(
            events,
            vec![AppEvent::StaleResponseDropped(FetchRequest::PlanBundle {
                builder: BuilderId::new(1),
                community: CommunityId::new(10),
            })]
        );
        assert!(state.floor_plans().is_empty());
    }

    #[test]
    fn option_toggle_rederives_and_undo_restores() {
        let mut state = loaded_state();
        let before = state.plumbing.lines();
        let events = state.dispatch(AppCommand::ToggleOption("Laundry".to_owned()));
        assert!(events.contains(&AppEvent::ListChanged(ListKind::Plumbing)));
        assert_eq!(
            state.plumbing.lines().last().map(String::as_str),
            Some("1 - LB20 - Laundry Box")
        );

        state.dispatch(AppCommand::Undo(ListKind::Plumbing));
        assert_eq!(state.plumbing.lines(), before);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut state = loaded_state();
        let events = state.dispatch(AppCommand::ToggleOption("Wine Bar".to_owned()));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("unknown option \"Wine Bar\"".to_owned())]
        );
    }

    #[test]
    fn set_options_drops_unknown_and_duplicate_names() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::SetOptions(vec![
            "Laundry".to_owned(),
            "Wine Bar".to_owned(),
            "Laundry".to_owned(),
        ]));
        assert_eq!(state.selection.options, vec!["Laundry".to_owned()]);
    }

    #[test]
    fn floor_plan_change_clears_options() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ToggleOption("Laundry".to_owned()));
        state.dispatch(AppCommand::SelectFloorPlan("PlanB".to_owned()));
        assert!(state.selection.options.is_empty());
        assert_eq!(state.plumbing.lines(), vec!["1 - T100 - Toilet"]);
        assert!(state.trim.is_empty());
    }

    #[test]
    fn trim_model_selection_replaces_manual_edits() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::AddCustomItem {
            list: ListKind::Trim,
            text: "Towel Bar".to_owned(),
        });
        let selection: TrimSelection = [("faucet", "7594C"), ("brand", "Moen")]
            .into_iter()
            .collect();
        state.dispatch(AppCommand::SelectTrimModels(selection));
        assert_eq!(state.trim.lines(), vec!["1 - 7594C - faucet"]);

        state.dispatch(AppCommand::ClearTrimModels);
        assert_eq!(
            state.trim.lines(),
            vec!["1 - 7594C - Kitchen Faucet", "2 - 6400 - Lav Faucet"]
        );
    }

    #[test]
    fn faucet_model_edit_updates_tracked_model() {
        let mut state = loaded_state();
        let events = state.dispatch(AppCommand::SetFaucetModel {
            list: ListKind::Plumbing,
            index: 0,
            model: "7185SRS".to_owned(),
        });
        assert_eq!(
            events,
            vec![
                AppEvent::ListChanged(ListKind::Plumbing),
                AppEvent::KitchenFaucetModelChanged("7185SRS".to_owned()),
            ]
        );
        assert_eq!(state.plumbing.lines()[0], "1 - 7185SRS - Kitchen Faucet");

        // The trim list still names 7594C; it is tracked only after this derivation.
        let events = state.dispatch(AppCommand::ToggleOption("Laundry".to_owned()));
        assert_eq!(
            state.plumbing.lines(),
            vec![
                "1 - 7185SRS - Kitchen Faucet",
                "2 - WidgetX - Sink",
                "1 - LB20 - Laundry Box",
            ]
        );
        assert!(events.contains(&AppEvent::KitchenFaucetModelChanged("7594C".to_owned())));
        assert_eq!(state.kitchen_faucet_model, "7594C");
    }

    #[test]
    fn tracked_model_applies_on_the_following_derivation() {
        let mut state = loaded_state();
        assert_eq!(state.kitchen_faucet_model, "7594C");
        state.dispatch(AppCommand::ToggleOption("Upgrade1".to_owned()));
        assert_eq!(state.plumbing.lines()[0], "1 - 7594C - Kitchen Faucet");
    }

    #[test]
    fn setting_the_same_model_is_reported_not_rejected() {
        let mut state = loaded_state();
        let events = state.dispatch(AppCommand::SetFaucetModel {
            list: ListKind::Trim,
            index: 0,
            model: "7594C".to_owned(),
        });
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("trim row 1 already uses 7594C".to_owned())]
        );

        let events = state.dispatch(AppCommand::SetFaucetModel {
            list: ListKind::Trim,
            index: 7,
            model: "7594C".to_owned(),
        });
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("cannot set model on trim row 8".to_owned())]
        );
    }

    #[test]
    fn list_edits_report_status_when_out_of_range() {
        let mut state = loaded_state();
        let depth = state.plumbing.history_depth();
        let events = state.dispatch(AppCommand::RemoveItem {
            list: ListKind::Plumbing,
            index: 9,
        });
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("no plumbing row 10".to_owned())]
        );
        assert_eq!(state.plumbing.history_depth(), depth);
    }

    #[test]
    fn clipboard_text_covers_one_or_both_lists() {
        let state = loaded_state();
        assert_eq!(
            state.clipboard_text(Some(ListKind::Trim)),
            "1 - 7594C - Kitchen Faucet\n2 - 6400 - Lav Faucet"
        );
        assert!(state.clipboard_text(None).starts_with("Plumbing Takeoff:\n"));
    }
}
