use spacepack::{Dimensions, PackingSession, StrategyKind};

fn main() {
    env_logger::init();

    let mut session = PackingSession::new(StrategyKind::BestFit.strategy());
    session
        .set_overflow(Dimensions::new(10.0, 10.0, 10.0), Some(4))
        .unwrap();

    for _ in 0..20 {
        session.add_item(Dimensions::new(4.0, 4.0, 4.0)).unwrap();
    }

    let summary = session.run();
    println!("Pack result: {:#?}", summary);

    for (container, root) in session.containers() {
        println!("Container {}:\n{}", container, session.tree().display(root));
    }
}
