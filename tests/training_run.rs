use std::time::Duration;

use nn_train_viz::journal::Severity;
use nn_train_viz::model::{Activation, DatasetDescriptor, NetworkTopology, template};
use nn_train_viz::render::{self, ChartScale, CommandList, Rendered};
use nn_train_viz::scheduler::{Clock, ManualClock};
use nn_train_viz::session::{MAX_HISTORY, RunStatus, Session};
use nn_train_viz::trainer::{TICK_INTERVAL, Trainer, Transition};
use rand::{SeedableRng, rngs::StdRng};

fn xor_dataset() -> DatasetDescriptor {
    DatasetDescriptor {
        source: "data/XOR_dataset.csv".into(),
        inputs: 2,
        outputs: 1,
        has_header: true,
        loaded: String::new(),
    }
}

fn network_from_template(name: &str) -> NetworkTopology {
    template(name)
        .unwrap()
        .rows()
        .into_iter()
        .fold(NetworkTopology::builder(), |b, (n, act)| b.layer(n, act))
        .build()
        .unwrap()
}

#[test]
fn simulated_run_drives_every_view() {
    let clock = ManualClock::new();
    let mut rng = StdRng::seed_from_u64(42);
    let mut session = Session::new();
    let mut trainer = Trainer::new();

    let mut chart = CommandList::new(640.0, 320.0);
    assert_eq!(render::draw_error_curve(&mut chart, &session.run.samples), Rendered::Placeholder);

    session.create_network(network_from_template("medium"));
    session.load_dataset(xor_dataset()).unwrap();
    session.params.epochs = 40;
    assert_eq!(trainer.start(&mut session, clock.now()), Ok(Transition::Applied));

    // Frames arrive irregularly; ticks still fire once per interval.
    for step_ms in [35, 250, 10, 700, 5, 3000, 1000] {
        clock.advance(Duration::from_millis(step_ms));
        trainer.poll(&mut session, clock.now(), &mut rng);
    }

    assert_eq!(session.run.status, RunStatus::Stopped);
    assert_eq!(session.run.current_epoch, 40);
    assert_eq!(session.run.samples.len(), 40);
    assert_eq!(session.history.len(), 1);
    assert_eq!(session.log.count(Severity::Warning), 0);

    let mut diagram = CommandList::new(800.0, 500.0);
    assert_eq!(render::draw_network(&mut diagram, session.topology.as_ref()), Rendered::Drawn);
    assert_eq!(diagram.circles().count(), 2 + 8 + 4 + 1);

    let mut chart = CommandList::new(640.0, 320.0);
    assert_eq!(render::draw_error_curve(&mut chart, &session.run.samples), Rendered::Drawn);
    let pts = chart.polylines().next().unwrap().to_vec();
    assert_eq!(pts.len(), 40);
    assert!(pts.windows(2).all(|w| w[0].x < w[1].x));

    let mut heatmap = CommandList::new(300.0, 300.0);
    assert_eq!(
        render::draw_confusion_matrix(&mut heatmap, session.confusion.as_ref()),
        Rendered::Drawn
    );
}

#[test]
fn clearing_the_chart_rescales_from_scratch() {
    let clock = ManualClock::new();
    let mut rng = StdRng::seed_from_u64(8);
    let mut session = Session::new();
    let mut trainer = Trainer::new();
    session.create_network(network_from_template("simple"));
    session.load_dataset(xor_dataset()).unwrap();
    session.params.epochs = 200;
    trainer.start(&mut session, clock.now()).unwrap();

    clock.advance(TICK_INTERVAL * 20);
    trainer.poll(&mut session, clock.now(), &mut rng);
    let before = ChartScale::from_samples(&session.run.samples).unwrap();
    assert_eq!(before.max_epoch, 20);

    session.clear_chart();
    assert!(ChartScale::from_samples(&session.run.samples).is_none());

    clock.advance(TICK_INTERVAL * 3);
    trainer.poll(&mut session, clock.now(), &mut rng);
    let after = ChartScale::from_samples(&session.run.samples).unwrap();
    assert_eq!(after.max_epoch, 23);
    assert!(after.max_error <= before.max_error);
    assert_eq!(session.run.samples.len(), 3);
}

#[test]
fn history_keeps_the_ten_latest_runs() {
    let clock = ManualClock::new();
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = Session::new();
    let mut trainer = Trainer::new();
    session.create_network(
        NetworkTopology::builder()
            .layer(2, Activation::Linear)
            .layer(1, Activation::Sigmoid)
            .build()
            .unwrap(),
    );
    session.load_dataset(xor_dataset()).unwrap();
    session.params.epochs = 1000;

    for run in 1..=12u32 {
        trainer.start(&mut session, clock.now()).unwrap();
        clock.advance(TICK_INTERVAL * run);
        trainer.poll(&mut session, clock.now(), &mut rng);
        assert_eq!(trainer.stop(&mut session, clock.now()), Transition::Applied);
    }

    assert_eq!(session.history.len(), MAX_HISTORY);
    let epochs: Vec<u32> = session.history.iter().map(|h| h.epochs_run).collect();
    assert_eq!(epochs, (3..=12).rev().collect::<Vec<_>>());
}
