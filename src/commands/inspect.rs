use spacepack::ContainerId;

use crate::{
    commands::read_job,
    options::{GlobalOptions, InspectOptions},
};

pub fn inspect(global: GlobalOptions, options: InspectOptions) -> anyhow::Result<()> {
    let job = read_job(&options.job)?;
    let strategy = global.strategy.unwrap_or(job.strategy);

    let mut session = job.session(strategy)?;
    session.run();

    let view = session.container_view(ContainerId::new(options.container))?;

    println!(
        "Container {} ({} bins, {} items):",
        view.id,
        session.tree().preorder(view.root).count(),
        view.items.len()
    );
    print!("{}", session.tree().display(view.root));

    for item in &view.items {
        if let Some(placement) = item.placement() {
            println!(
                "item {} {} @ {} in bin {}",
                item.id(),
                item.size(),
                placement.position,
                placement.bin
            );
        }
    }

    Ok(())
}
