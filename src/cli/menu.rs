use std::cell::RefCell;
use std::error::Error;
use std::io::{self, BufRead, Write};

use tracing::{error, info, span, Level};

use crate::cli::prompt::{Answer, Prompter};
use crate::config::constant::DEMO_ROAD_PROBABILITY;
use crate::config::StoreConfig;
use crate::domain::types::{CityOutcome, SearchMode};
use crate::domain::StoreError;
use crate::fixtures::network_generator::{generate_random_network, seed_store};
use crate::store::RoadNetworkStore;
use crate::utils::init_tracing_and_env;
use crate::view::render::{
    render_cities, render_city_hit, render_recorded_data, render_roads,
};

const MENU: &str = "\nMenu:\n\
1. Add new city(ies)\n\
2. Add roads between cities\n\
3. Add/Update budget to the roads\n\
4. Edit city\n\
5. Search for a city using its index or name\n\
6. Display cities\n\
7. Display roads\n\
8. Display recorded data on the console\n\
9. Exit\n";

const INVALID_NUMBER: &str = "Invalid input. Please enter a number.";
const INVALID_BUDGET: &str = "Invalid budget. Please enter a valid number.";

/// Whether the session should keep reading after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Eof,
}

/// Unwraps an answer, or returns from the operation on bad or missing input.
macro_rules! answer_or_return {
    ($prompter:expr, $answer:expr, $invalid:expr) => {
        match $answer {
            Answer::Value(value) => value,
            Answer::Invalid => {
                $prompter.error($invalid)?;
                return Ok(Step::Continue);
            }
            Answer::Eof => return Ok(Step::Eof),
        }
    };
}

/// Entry point of the `roadnet` binary.
pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env()?;
    let config = StoreConfig::from_env();

    let mut store = RoadNetworkStore::from_config(&config);
    store.load()?;

    if let Some(count) = config.demo_cities {
        if store.city_count() == 0 {
            let network = generate_random_network(count, DEMO_ROAD_PROBABILITY, config.demo_seed);
            seed_store(&mut store, &network)?;
            info!(
                "Seeded demo dataset with {} cities and {} roads",
                network.names.len(),
                network.roads.len()
            );
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut store, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Runs the numbered menu until choice 9 or end of input.
pub fn run_session<R: BufRead, W: Write>(
    store: &mut RoadNetworkStore,
    input: R,
    output: W,
) -> io::Result<W> {
    let session_span = span!(Level::INFO, "session");
    let _guard = session_span.enter();

    let mut prompter = Prompter::new(input, output);
    loop {
        prompter.print(MENU)?;
        let choice = match prompter.ask::<i64>("Enter choice: ")? {
            Answer::Value(choice) => choice,
            Answer::Invalid => {
                prompter.error("Invalid input. Please enter a number between 1 and 9.")?;
                continue;
            }
            Answer::Eof => {
                info!("Input closed, leaving menu");
                break;
            }
        };

        let step = match choice {
            1 => add_cities(store, &mut prompter)?,
            2 => add_road(store, &mut prompter)?,
            3 => update_budget(store, &mut prompter)?,
            4 => edit_city(store, &mut prompter)?,
            5 => search_city(store, &mut prompter)?,
            6 => {
                prompter.print(&render_cities(store))?;
                Step::Continue
            }
            7 => {
                prompter.print(&render_roads(store))?;
                Step::Continue
            }
            8 => {
                prompter.print(&render_recorded_data(store))?;
                Step::Continue
            }
            9 => {
                prompter.say("Exiting...")?;
                break;
            }
            _ => {
                prompter.error("Invalid choice. Please select 1-9.")?;
                Step::Continue
            }
        };

        if step == Step::Eof {
            info!("Input closed during operation {}, leaving menu", choice);
            break;
        }
    }
    Ok(prompter.into_output())
}

fn add_cities<R: BufRead, W: Write>(
    store: &mut RoadNetworkStore,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Step> {
    let count = answer_or_return!(
        prompter,
        prompter.ask::<i64>("Enter number of cities to add: ")?,
        INVALID_NUMBER
    );

    let shared = RefCell::new(prompter);
    let mut read_failure: Option<io::Error> = None;
    let mut write_failure: Option<io::Error> = None;
    let mut eof = false;

    let names = (0..count).map_while(|_| {
        match shared.borrow_mut().ask_token("Enter city name: ") {
            Ok(Some(name)) => Some(name),
            Ok(None) => {
                eof = true;
                None
            }
            Err(e) => {
                read_failure = Some(e);
                None
            }
        }
    });

    let saved = store.add_cities_with(names, |outcome| {
        let message = match outcome {
            CityOutcome::Added(_) => return,
            CityOutcome::Duplicate(name) => StoreError::DuplicateName(name.clone()),
            CityOutcome::Invalid(name) => StoreError::InvalidName(name.clone()),
        };
        if let Err(e) = shared.borrow_mut().error(&message.to_string()) {
            write_failure.get_or_insert(e);
        }
    });

    let prompter = shared.into_inner();
    if let Some(e) = read_failure.or(write_failure) {
        return Err(e);
    }
    if let Err(e) = saved {
        report(prompter, &e)?;
    }
    Ok(if eof { Step::Eof } else { Step::Continue })
}

fn add_road<R: BufRead, W: Write>(
    store: &mut RoadNetworkStore,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Step> {
    let (first, second) = match ask_pair(prompter)? {
        Answer::Value(pair) => pair,
        Answer::Invalid => return Ok(Step::Continue),
        Answer::Eof => return Ok(Step::Eof),
    };
    if let Err(e) = store.check_new_road(first, second) {
        report(prompter, &e)?;
        return Ok(Step::Continue);
    }

    let budget = answer_or_return!(
        prompter,
        prompter.ask::<f64>("Enter budget for the road: ")?,
        INVALID_BUDGET
    );
    if let Err(e) = store.add_road(first, second, budget) {
        report(prompter, &e)?;
    }
    Ok(Step::Continue)
}

fn update_budget<R: BufRead, W: Write>(
    store: &mut RoadNetworkStore,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Step> {
    let (first, second) = match ask_pair(prompter)? {
        Answer::Value(pair) => pair,
        Answer::Invalid => return Ok(Step::Continue),
        Answer::Eof => return Ok(Step::Eof),
    };
    if let Err(e) = store.check_existing_road(first, second) {
        report(prompter, &e)?;
        return Ok(Step::Continue);
    }

    let budget = answer_or_return!(
        prompter,
        prompter.ask::<f64>("Enter new budget for the road: ")?,
        INVALID_BUDGET
    );
    if let Err(e) = store.update_budget(first, second, budget) {
        report(prompter, &e)?;
    }
    Ok(Step::Continue)
}

fn edit_city<R: BufRead, W: Write>(
    store: &mut RoadNetworkStore,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Step> {
    let index = answer_or_return!(
        prompter,
        ask_index(prompter, "Enter city index to edit: ")?,
        INVALID_NUMBER
    );
    if let Err(e) = store.check_index(index) {
        report(prompter, &e)?;
        return Ok(Step::Continue);
    }

    let new_name = match prompter.ask_token("Enter new city name: ")? {
        Some(name) => name,
        None => return Ok(Step::Eof),
    };
    if let Err(e) = store.edit_city(index, new_name) {
        report(prompter, &e)?;
    }
    Ok(Step::Continue)
}

fn search_city<R: BufRead, W: Write>(
    store: &RoadNetworkStore,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Step> {
    let mode = match prompter.ask_token("Search by index (i) or name (n)? ")? {
        Some(token) => SearchMode::from_token(&token),
        None => return Ok(Step::Eof),
    };

    match mode {
        Some(SearchMode::Index) => {
            let index = answer_or_return!(
                prompter,
                ask_index(prompter, "Enter city index: ")?,
                INVALID_NUMBER
            );
            match store.search_by_index(index) {
                Some(city) => prompter.print(&render_city_hit(city))?,
                None => prompter.say("City not found.")?,
            }
        }
        Some(SearchMode::Name) => {
            let needle = match prompter.ask_token("Enter part of the city name: ")? {
                Some(needle) => needle,
                None => return Ok(Step::Eof),
            };
            let hits = store.search_by_name(&needle);
            if hits.is_empty() {
                prompter.say(&format!("No cities found matching '{needle}'."))?;
            }
            for city in hits {
                prompter.print(&render_city_hit(city))?;
            }
        }
        None => prompter.error("Invalid choice. Use 'i' for index or 'n' for name.")?,
    }
    Ok(Step::Continue)
}

/// Reads both road endpoints. Invalid input is reported here.
fn ask_pair<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> io::Result<Answer<(usize, usize)>> {
    let mut pair = [0usize; 2];
    for (slot, prompt) in pair
        .iter_mut()
        .zip(["Enter first city index: ", "Enter second city index: "])
    {
        match ask_index(prompter, prompt)? {
            Answer::Value(index) => *slot = index,
            Answer::Invalid => {
                prompter.error(INVALID_NUMBER)?;
                return Ok(Answer::Invalid);
            }
            Answer::Eof => return Ok(Answer::Eof),
        }
    }
    Ok(Answer::Value((pair[0], pair[1])))
}

/// Any integer is accepted here; negatives map to 0, which every index
/// check rejects.
fn ask_index<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    prompt: &str,
) -> io::Result<Answer<usize>> {
    Ok(match prompter.ask::<i64>(prompt)? {
        Answer::Value(raw) => Answer::Value(usize::try_from(raw).unwrap_or(0)),
        Answer::Invalid => Answer::Invalid,
        Answer::Eof => Answer::Eof,
    })
}

fn report<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, err: &StoreError) -> io::Result<()> {
    if err.is_validation() {
        prompter.error(&err.to_string())
    } else {
        error!("Failed to save data: {}", err);
        prompter.error(&format!("Failed to save data: {err}"))
    }
}
