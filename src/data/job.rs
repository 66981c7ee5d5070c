use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use spacepack::{Dimensions, PackError, PackingSession, StrategyKind};
use thiserror::Error;

/// A packing job, contained in a TOML file.
///
/// A job names the container size, how many containers are available, and the
/// items to pack in the order they should be attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Job {
    /// The name of the job, echoed back in reports.
    pub name: String,

    /// Which placement strategy to use unless one is given on the command line.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// The size of every container in this job.
    pub container: Dimensions,

    /// How many containers are open before packing starts.
    #[serde(default = "default_containers")]
    pub containers: usize,

    /// The most containers this job may use. When this is larger than
    /// `containers`, extra containers are opened as items stop fitting.
    #[serde(default)]
    pub max_containers: Option<usize>,

    #[serde(default)]
    pub items: Vec<ItemConfig>,

    /// The path that this job came from.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Job {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, JobError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let mut job = Self::from_toml(&contents, path)?;
        job.file_path = path.to_owned();

        Ok(job)
    }

    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, JobError> {
        let job: Self = toml::from_str(contents).map_err(|source| JobError::Toml {
            path: path.to_owned(),
            source,
        })?;

        if let Some(max) = job.max_containers {
            if max < job.containers {
                return Err(JobError::ContainerLimit {
                    path: path.to_owned(),
                    containers: job.containers,
                    max_containers: max,
                });
            }
        }

        Ok(job)
    }

    /// Every item to pack, with counts expanded, in input order.
    pub fn expanded_items(&self) -> impl Iterator<Item = &ItemConfig> {
        self.items
            .iter()
            .flat_map(|item| std::iter::repeat(item).take(item.count))
    }

    /// Sets up a packing session with this job's containers and items.
    pub fn session(&self, strategy: StrategyKind) -> Result<PackingSession, PackError> {
        let mut session = PackingSession::new(strategy.strategy());

        for _ in 0..self.containers {
            session.add_container(self.container)?;
        }

        if let Some(max) = self.max_containers {
            if max > self.containers {
                session.set_overflow(self.container, Some(max))?;
            }
        }

        for item in self.expanded_items() {
            session.add_item(item.size)?;
        }

        Ok(session)
    }
}

fn default_containers() -> usize {
    1
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ItemConfig {
    pub size: Dimensions,

    /// How many copies of this item to pack.
    #[serde(default = "default_count")]
    pub count: usize,

    /// A name to carry through to the report.
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("{source} in {}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(
        "max-containers ({max_containers}) is smaller than containers ({containers}) in {}",
        path.display()
    )]
    ContainerLimit {
        path: PathBuf,
        containers: usize,
        max_containers: usize,
    },

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },
}

impl JobError {
    /// Tells whether this JobError originated because of a path not existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            JobError::Io { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
