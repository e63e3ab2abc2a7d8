//! Main navigation executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Input acquisition from the replay script:
//!             - Odometry
//!             - Localisation
//!             - Point clouds
//!             - Telecommands
//!         - Navigation control processing
//!         - Archive writing
//!         - Cycle management
//!
//! # Modules
//!
//! All modules (e.g. `nav_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::tc::NavTc;
use nav_lib::{
    data_store::DataStore,
    nav_ctrl::{self, NavCtrl},
    params::{MapFile, NavExecParams},
};
use util::{
    archive::Archived,
    host,
    logger::{logger_init, parse_level},
    module::State,
    script_interpreter::{PendingInputs, ScriptInterpreter},
    session::{self, Session},
    signal::setup_ctrl_c_handler,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Command line options.
#[derive(Debug, StructOpt)]
#[structopt(name = "nav_exec", about = "Vehicle navigation core")]
struct Opts {
    /// Replay script of timestamped inputs to feed to the core
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Navigation control parameter file, defaults to
    /// $NAV_SW_ROOT/params/nav_ctrl.toml
    #[structopt(short, long, parse(from_os_str))]
    params: Option<PathBuf>,

    /// Map file providing the initial goal
    #[structopt(short, long, parse(from_os_str))]
    map: Option<PathBuf>,

    /// Stop after this many cycles
    #[structopt(long)]
    max_cycles: Option<u128>,

    /// Telecommand executed before the first cycle
    #[structopt(subcommand)]
    tc: Option<NavTc>,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let exec_params: NavExecParams = util::params::load("nav_exec.toml")
        .wrap_err("Could not load exec params")?;

    // Initialise session
    let session = Session::new("nav_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = parse_level(&exec_params.log_level)
        .wrap_err("Invalid log level in exec params")?;
    logger_init(level, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Navigation Executable\n");
    match host::get_uname() {
        Ok(u) => info!("Running on: {:#?}", u),
        Err(e) => warn!("Could not get host information: {}", e),
    }
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI options: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let nav_params: nav_ctrl::Params = match opts.params {
        Some(ref path) => util::params::load_from_path(path),
        None => util::params::load("nav_ctrl.toml"),
    }
    .wrap_err("Could not load NavCtrl params")?;

    info!("Parameters loaded");

    // ---- INITIALISE INPUT SOURCE ----

    let mut script = match opts.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} inputs\n",
                si.get_duration(),
                si.get_num_inputs()
            );

            Some(si)
        }
        None => {
            info!("No script provided, the vehicle will remain halted\n");
            None
        }
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut nav_ctrl = NavCtrl::init(nav_ctrl::InitData {
        params: nav_params,
        cycle_period_s: exec_params.cycle_period_s,
    })
    .wrap_err("Failed to initialise NavCtrl")?;

    nav_ctrl
        .init_archives(&session)
        .wrap_err("Failed to initialise NavCtrl archives")?;

    info!("NavCtrl init complete");

    // Seed the goal from the map, then apply any command line TC on top
    if let Some(ref path) = opts.map {
        let map: MapFile = util::params::load_from_path(path)
            .wrap_err("Could not load the map file")?;

        match map.goal {
            Some(goal) => nav_ctrl.set_tc(NavTc::from(goal)),
            None => warn!("Map file {:?} contains no goal", path),
        }
    }

    if let Some(tc) = opts.tc {
        nav_ctrl.set_tc(tc);
    }

    let mut ds = DataStore::new(nav_ctrl);

    info!("Module initialisation complete\n");

    let running = setup_ctrl_c_handler().wrap_err("Failed to set the Ctrl-C handler")?;

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let cycle_period = Duration::from_secs_f64(exec_params.cycle_period_s);

    while running.load(Ordering::SeqCst) {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(
            exec_params.cycle_frequency_hz(),
            session::get_elapsed_seconds(),
        );

        // ---- DATA INPUT ----

        if let Some(ref mut si) = script {
            match si.get_pending_inputs(ds.sim_time_s) {
                PendingInputs::None => (),
                PendingInputs::Some(inputs) => {
                    for input in inputs {
                        debug!("{} input at {:.03} s", input.kind(), ds.sim_time_s);
                        ds.nav_ctrl.set_input(input);
                    }
                }
                // Exit if end of script reached
                PendingInputs::EndOfScript => {
                    info!("End of script reached, stopping");
                    break;
                }
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        let input = nav_ctrl::InputData {
            now: ds.replay_time(),
        };

        match ds.nav_ctrl.proc(&input) {
            Ok((o, r)) => {
                ds.nav_ctrl_output = o;
                ds.nav_ctrl_status_rpt = r;
            }
            Err(e) => match e {},
        }

        if ds.is_1_hz_cycle {
            info!(
                "{:?}: {:.3} m/s along {:.3} 1/m",
                ds.nav_ctrl_status_rpt.toc_state,
                ds.nav_ctrl_output.vel_ms,
                ds.nav_ctrl_output.curv_m
            );
        }

        // ---- WRITE ARCHIVES ----

        if let Err(e) = ds.nav_ctrl.write() {
            warn!("Could not write NavCtrl archives: {}", e);
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.cycle_on_time();
                thread::sleep(d);
            }
            None => {
                let overrun_s = cycle_dur.as_secs_f64() - cycle_period.as_secs_f64();
                if ds.cycle_overrun(overrun_s) > exec_params.max_consec_overruns {
                    error!(
                        "More than {} consecutive cycle overruns",
                        exec_params.max_consec_overruns
                    );
                }
            }
        }

        ds.cycle_end();

        if let Some(max) = opts.max_cycles {
            if ds.num_cycles >= max {
                info!("Reached {} cycles, stopping", max);
                break;
            }
        }
    }

    // ---- SHUTDOWN ----

    if !running.load(Ordering::SeqCst) {
        info!("Interrupted, stopping");
    }

    info!(
        "End of execution after {} cycles ({} overruns)",
        ds.num_cycles, ds.num_cycle_overruns
    );

    Ok(())
}
