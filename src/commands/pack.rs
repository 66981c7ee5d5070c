use std::io::{self, Write};

use fs_err as fs;

use crate::{
    commands::read_job,
    data::Report,
    options::{GlobalOptions, PackOptions},
};

pub fn pack(global: GlobalOptions, options: PackOptions) -> anyhow::Result<()> {
    let job = read_job(&options.job)?;
    let strategy = global.strategy.unwrap_or(job.strategy);

    log::info!("Packing job \"{}\" using {}", job.name, strategy);

    let mut session = job.session(strategy)?;
    let summary = session.run();

    for &id in &summary.unplaced {
        let size = session.items()[id.index()].size();
        log::warn!("Item {} ({}) could not be placed", id, size);
    }

    log::info!(
        "Placed {} of {} items into {} containers ({:.1}% full)",
        summary.placed,
        session.items().len(),
        summary.containers,
        summary.fill_ratio * 100.0
    );

    let report = Report::new(&job, &session)?;
    let serialized = serde_json::to_string_pretty(&report)?;

    match &options.output {
        Some(path) => {
            fs::write(path, serialized)?;
            log::info!("Wrote report to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", serialized)?;
        }
    }

    if options.fail_on_unplaced && !summary.unplaced.is_empty() {
        anyhow::bail!(
            "{} of {} items could not be placed",
            summary.unplaced.len(),
            session.items().len()
        );
    }

    Ok(())
}
