use anyhow::Result;
use clap::Parser;
use clinic_api::role::Role;
use clinic_session::router::{route, Screen};
use serde::Serialize;

use super::Context;
use crate::output::Row;

#[derive(Clone, Debug, Parser)]
pub(crate) struct RoutesArgs {
    /// Only show the screens of this role
    #[arg(long, value_name = "ROLE")]
    role: Option<Role>,
}

#[derive(Serialize)]
struct RouteRow {
    role: String,
    command: String,
    route: String,
}

impl Row for RouteRow {
    const HEADER: &'static [&'static str] = &["ROLE", "COMMAND", "ROUTE"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.role.clone(),
            self.command.clone(),
            self.route.clone(),
        ]
    }
}

impl RoutesArgs {
    pub(crate) fn run(self, context: &Context) -> Result<()> {
        let rows: Vec<_> = Role::ALL
            .into_iter()
            .filter(|role| self.role.map_or(true, |filter| filter == *role))
            .map(route)
            .flat_map(|route| {
                let role = route.role.to_string();
                let landing = RouteRow {
                    role: role.clone(),
                    command: "-".into(),
                    route: Screen::Landing(route.role).path(),
                };
                let operations = route.operations.iter().map(move |operation| RouteRow {
                    role: role.clone(),
                    command: operation.name(),
                    route: operation.route(),
                });
                ::std::iter::once(landing).chain(operations)
            })
            .collect();

        context.output.print_all(&rows)
    }
}
