// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod http;
mod static_catalog;

use anyhow::Result;
use takeoff_app::{AppCommand, Builder, BuilderId, Community, CommunityId, FetchRequest, PlanBundle};

pub use http::Client;
pub use static_catalog::StaticCatalog;

/// Where builders, communities and plan bundles come from.
pub trait CatalogSource {
    fn list_builders(&self) -> Result<Vec<Builder>>;
    fn list_communities(&self, builder: BuilderId) -> Result<Vec<Community>>;
    fn load_plan_bundle(&self, builder: BuilderId, community: CommunityId) -> Result<PlanBundle>;
}

impl<T: CatalogSource + ?Sized> CatalogSource for &T {
    fn list_builders(&self) -> Result<Vec<Builder>> {
        (**self).list_builders()
    }

    fn list_communities(&self, builder: BuilderId) -> Result<Vec<Community>> {
        (**self).list_communities(builder)
    }

    fn load_plan_bundle(&self, builder: BuilderId, community: CommunityId) -> Result<PlanBundle> {
        (**self).load_plan_bundle(builder, community)
    }
}

impl<T: CatalogSource + ?Sized> CatalogSource for Box<T> {
    fn list_builders(&self) -> Result<Vec<Builder>> {
        (**self).list_builders()
    }

    fn list_communities(&self, builder: BuilderId) -> Result<Vec<Community>> {
        (**self).list_communities(builder)
    }

    fn load_plan_bundle(&self, builder: BuilderId, community: CommunityId) -> Result<PlanBundle> {
        (**self).load_plan_bundle(builder, community)
    }
}

/// Runs one pipeline stage against `source` and wraps the answer as the matching load command.
pub fn fulfill<S: CatalogSource + ?Sized>(source: &S, request: FetchRequest) -> Result<AppCommand> {
    let command = match request {
        FetchRequest::Builders => AppCommand::BuildersLoaded(source.list_builders()?),
        FetchRequest::Communities(builder) => AppCommand::CommunitiesLoaded {
            builder,
            communities: source.list_communities(builder)?,
        },
        FetchRequest::PlanBundle { builder, community } => AppCommand::PlanBundleLoaded {
            builder,
            community,
            bundle: source.load_plan_bundle(builder, community)?,
        },
    };
    Ok(command)
}
