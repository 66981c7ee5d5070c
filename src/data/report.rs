use serde::{Deserialize, Serialize};
use spacepack::{ContainerId, Dimensions, ItemId, PackError, PackingSession, Point};

use crate::data::Job;

/// Describes where every item of a job ended up after packing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Report {
    pub name: String,
    pub strategy: String,

    /// Packed item volume divided by the volume of every container used.
    pub fill_ratio: f64,
    pub containers: Vec<ContainerReport>,
    pub unplaced: Vec<ItemReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ContainerReport {
    pub id: ContainerId,
    pub size: Dimensions,
    pub items: Vec<ItemReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ItemReport {
    /// The item's position in the job's expanded item list.
    pub index: ItemId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub size: Dimensions,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
}

impl Report {
    pub fn new(job: &Job, session: &PackingSession) -> Result<Self, PackError> {
        let labels: Vec<Option<&String>> = job
            .expanded_items()
            .map(|item| item.label.as_ref())
            .collect();

        let item_report = |id: ItemId| -> ItemReport {
            let item = &session.items()[id.index()];

            ItemReport {
                index: id,
                label: labels.get(id.index()).copied().flatten().cloned(),
                size: item.size(),
                position: item.placement().map(|placement| placement.position),
            }
        };

        let mut containers = Vec::new();

        for (id, root) in session.containers() {
            let view = session.container_view(id)?;

            containers.push(ContainerReport {
                id,
                size: session.tree().get(root).geometry().size,
                items: view.items.iter().map(|item| item_report(item.id())).collect(),
            });
        }

        let summary = session.summary();

        Ok(Report {
            name: job.name.clone(),
            strategy: session.strategy_name().to_owned(),
            fill_ratio: summary.fill_ratio,
            containers,
            unplaced: summary.unplaced.into_iter().map(item_report).collect(),
        })
    }
}
