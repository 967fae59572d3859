mod bootstrap;

use bootstrap::{AppConfig, init_logging};
use squadsplit_application::LedgerProcessor;
use squadsplit_domain::{ParticipantId, SplitContext};
use squadsplit_i18n as i18n;
use squadsplit_infrastructure::JsonLedgerStore;
use squadsplit_presentation::{CounterpartyPresenter, SettlementPresenter};
use std::{borrow::Cow, env, error::Error, path::Path, process};

type CliResult<T> = Result<T, Cow<'static, str>>;

const USAGE: &str = "Usage: squadsplit_interpreter <ledger.json> [viewer-id]";

fn main() {
    init_logging();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        return Err(USAGE.into());
    };
    let viewer = args
        .next()
        .map(|raw| {
            raw.parse::<u64>()
                .map(ParticipantId)
                .map_err(|_| format!("Invalid viewer id '{raw}'\n{USAGE}"))
        })
        .transpose()?;

    let config = AppConfig::from_env().map_err(|err| describe(&err))?;
    let context = config.context;

    let store = JsonLedgerStore::from_path(Path::new(&path), context)
        .map_err(|err| format!("Failed to load '{path}': {}", describe(&err)))?;
    let processor = LedgerProcessor::new(&store, &store, context);

    match viewer {
        Some(viewer) => print_global_summary(&processor, &store, viewer, context),
        None => print_trip_summaries(&processor, &store, context),
    }
}

fn print_trip_summaries(
    processor: &LedgerProcessor<'_>,
    store: &JsonLedgerStore,
    context: SplitContext,
) -> CliResult<()> {
    for (trip, name) in store.trips() {
        let summary = processor
            .trip_summary(trip)
            .map_err(|err| describe(&err))?;
        let view = SettlementPresenter::render(&summary, store, context);

        println!("== {name} ({trip}) ==");
        println!("{}", view.share_table);
        println!("{}", view.balance_table);
        match view.settlement_table {
            Some(table) => println!("{table}"),
            None => println!("{}\n", i18n::ALL_SETTLED),
        }
        for line in &view.diagnostics {
            println!("! {line}");
        }
    }

    Ok(())
}

fn print_global_summary(
    processor: &LedgerProcessor<'_>,
    store: &JsonLedgerStore,
    viewer: ParticipantId,
    context: SplitContext,
) -> CliResult<()> {
    let summary = processor
        .global_summary(viewer)
        .map_err(|err| describe(&err))?;
    let view = CounterpartyPresenter::render(&summary, store, context);

    if let Some(table) = view.owed_to_me_table {
        println!("== {} ==", i18n::OWED_TO_ME);
        println!("{table}");
    }
    if let Some(table) = view.i_owe_table {
        println!("== {} ==", i18n::I_OWE);
        println!("{table}");
    }
    println!("{}", view.position_table);
    for line in &view.diagnostics {
        println!("! {line}");
    }

    Ok(())
}

/// Flattens an error and its sources into one line.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
