//! Implementations for the NavCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::{debug, info, trace, warn};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{NavCtrlError, Params};
use crate::{
    lat_comp::LatComp,
    loc::Pose2D,
    obst_anal::{ObstAnal, PointCloud},
    state_est::StateEst,
    toc_ctrl::{self, TocCtrl, TocState},
};
use comms_if::{
    eqpt::{drive::DriveCmd, lidar::CloudSample, loc::LocFix, odom::OdomSample},
    tc::NavTc,
    NavInput,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    session::Session,
    time::age_s,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Navigation control module state
pub struct NavCtrl {
    params: Params,

    state_est: StateEst,
    obst_anal: ObstAnal,
    lat_comp: LatComp,
    toc_ctrl: TocCtrl,

    /// Curvature of the path currently being driven.
    curv_m: f64,

    /// Navigation goal in the map frame.
    goal: Option<Pose2D>,
    goal_reached: bool,

    // Inputs received since the last cycle. Only the newest sample of each
    // kind is kept, telecommands are all kept in arrival order.
    pending_odom: Option<OdomSample>,
    pending_loc: Option<LocFix>,
    pending_cloud: Option<CloudSample>,
    pending_tcs: Vec<NavTc>,

    odom_was_stale: bool,
    cloud_was_stale: bool,
    loc_was_stale: bool,

    report: StatusReport,
    arch_report: Archiver,

    output: DriveCmd,
    arch_output: Archiver,
}

/// Data required to initialise NavCtrl.
#[derive(Debug, Clone)]
pub struct InitData {
    pub params: Params,

    /// Period of the control cycle.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

/// Input data to NavCtrl.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Time at which this cycle runs, on the same clock as the sample
    /// timestamps.
    pub now: DateTime<Utc>,
}

/// Status report for NavCtrl processing.
///
/// A flat record so that it can be archived as a CSV row.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// Cycle time in milliseconds since the Unix epoch.
    pub time_ms: i64,

    pub ready: bool,

    pub toc_state: TocState,

    /// Free path used by the controller, empty when clear.
    ///
    /// Units: meters
    pub free_path_m: Option<f64>,

    /// Units: meters
    pub stopping_dist_m: f64,

    /// Units: meters/second
    pub speed_ms: f64,

    /// Units: 1/meters
    pub curv_m: f64,

    // Predicted pose in the odometry frame
    pub pred_x_m: f64,
    pub pred_y_m: f64,
    pub pred_heading_rad: f64,

    pub num_cloud_points: usize,
    pub odom_stale: bool,
    pub cloud_stale: bool,
    pub loc_stale: bool,

    /// Distance from the predicted global pose to the goal, empty if there is
    /// no goal or it could not be measured.
    ///
    /// Units: meters
    pub goal_dist_m: Option<f64>,
    pub goal_reached: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for NavCtrl {
    type InitData = InitData;
    type InitError = NavCtrlError;

    type InputData = InputData;
    type OutputData = DriveCmd;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the NavCtrl module and all of its submodules.
    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        let params = init_data.params;
        params.validate()?;

        let toc_ctrl = TocCtrl::init(toc_ctrl::InitData {
            params: params.toc_ctrl.clone(),
            dt_s: init_data.cycle_period_s,
        })?;

        let state_est = StateEst::new(&params.state_est)?;

        let lat_comp = LatComp::new(params.lat_comp.clone(), init_data.cycle_period_s);
        if lat_comp.iterations() > params.state_est.history_len {
            warn!(
                "Latency compensation needs {} history samples but only {} are kept, the \
                 predicted pose will always be the current pose",
                lat_comp.iterations(),
                params.state_est.history_len
            );
        }

        Ok(Self {
            state_est,
            obst_anal: ObstAnal::new(params.obst_anal.clone()),
            lat_comp,
            toc_ctrl,
            curv_m: params.initial_curv_m,
            goal: None,
            goal_reached: false,
            pending_odom: None,
            pending_loc: None,
            pending_cloud: None,
            pending_tcs: Vec::new(),
            odom_was_stale: false,
            cloud_was_stale: false,
            loc_was_stale: false,
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            output: DriveCmd::default(),
            arch_output: Archiver::default(),
            params,
        })
    }

    /// Perform one cycle of navigation control.
    ///
    /// Never fails, there is always a safe command to give.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        let now = input_data.now;

        // ---- INGEST ----

        self.ingest();

        let ready = self.state_est.is_ready();
        let current = self.state_est.state().pose;
        let speed_ms = self.state_est.state().speed_ms;

        // The measured speed can't be trusted once odometry stops updating
        let odom_stale = ready && self.is_odom_stale(now);
        if odom_stale != self.odom_was_stale {
            if odom_stale {
                warn!("Odometry is stale, halting");
            }
            else {
                info!("Fresh odometry received");
            }
            self.odom_was_stale = odom_stale;
        }

        // ---- PREDICT ----

        let predicted = self.lat_comp.predict(self.state_est.history(), &current);

        // ---- FREE PATH ----

        let cloud_stale = self.is_cloud_stale(now);
        if cloud_stale != self.cloud_was_stale {
            if cloud_stale {
                warn!(
                    "Point cloud is stale, assuming {:?}",
                    self.params.stale_cloud_policy
                );
            }
            else {
                info!("Fresh point cloud received");
            }
            self.cloud_was_stale = cloud_stale;
        }

        let mut free_path = if cloud_stale {
            self.params.stale_cloud_policy.free_path()
        }
        else {
            self.obst_anal
                .free_path(&predicted, self.curv_m)
                .unwrap_or_else(|| self.params.stale_cloud_policy.free_path())
        };

        // ---- GOAL ----

        let loc_stale = self.is_loc_stale(now);
        if loc_stale != self.loc_was_stale {
            if loc_stale && self.goal.is_some() {
                warn!("Localisation is stale, goal termination suspended");
            }
            self.loc_was_stale = loc_stale;
        }

        let mut goal_dist_m = None;

        if let Some(goal) = self.goal {
            if !loc_stale {
                if let Some(global) = self.state_est.global_pose() {
                    // Move the fix on by the displacement predicted in the
                    // odometry frame
                    let dist_m = global
                        .compose(&predicted.relative_to(&current))
                        .distance_to(&goal);
                    goal_dist_m = Some(dist_m);

                    if dist_m <= self.params.goal_tolerance_m && !self.goal_reached {
                        info!("Goal reached ({:.3} m away)", dist_m);
                        self.goal_reached = true;
                    }

                    free_path = free_path.cap(dist_m);
                }
            }

            if self.goal_reached {
                free_path = free_path.cap(0.0);
            }
        }

        // ---- CONTROL ----

        let (output, toc_report) = self
            .toc_ctrl
            .proc(&toc_ctrl::InputData {
                ready: ready && !odom_stale,
                speed_ms,
                free_path,
                curv_m: self.curv_m,
            })
            .unwrap_or_else(|e| match e {});

        self.report = StatusReport {
            time_ms: now.timestamp_millis(),
            ready,
            toc_state: toc_report.state,
            free_path_m: free_path.blocked_m(),
            stopping_dist_m: toc_report.stopping_dist_m,
            speed_ms,
            curv_m: self.curv_m,
            pred_x_m: predicted.loc_m.x,
            pred_y_m: predicted.loc_m.y,
            pred_heading_rad: predicted.heading_rad,
            num_cloud_points: self.obst_anal.cloud().map_or(0, |c| c.len()),
            odom_stale,
            cloud_stale,
            loc_stale,
            goal_dist_m,
            goal_reached: self.goal_reached,
        };
        self.output = output;

        trace!(
            "NavCtrl: {:?}, free path {:?}, cmd {:?}",
            self.report.toc_state,
            free_path,
            output
        );

        Ok((output, self.report))
    }
}

impl Archived for NavCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        self.arch_output.serialise(self.output)?;

        Ok(())
    }
}

impl NavCtrl {
    /// Start archiving the status report and drive command into the session.
    pub fn init_archives(&mut self, session: &Session) -> Result<(), ArchiveError> {
        self.arch_report = Archiver::from_path(session, "nav_ctrl/status_report.csv")?;
        self.arch_output = Archiver::from_path(session, "nav_ctrl/drive_cmd.csv")?;

        Ok(())
    }

    /// Queue an input for the next cycle.
    pub fn set_input(&mut self, input: NavInput) {
        match input {
            NavInput::Odom(o) => self.set_odometry(o),
            NavInput::Loc(l) => self.set_localisation(l),
            NavInput::Cloud(c) => self.set_point_cloud(c),
            NavInput::Tc(tc) => self.set_tc(tc),
        }
    }

    /// Queue an odometry sample, replacing any not yet processed.
    pub fn set_odometry(&mut self, sample: OdomSample) {
        if self.pending_odom.replace(sample).is_some() {
            trace!("Unprocessed odometry sample replaced");
        }
    }

    /// Queue a localisation fix, replacing any not yet processed.
    pub fn set_localisation(&mut self, fix: LocFix) {
        if self.pending_loc.replace(fix).is_some() {
            trace!("Unprocessed localisation fix replaced");
        }
    }

    /// Queue a point cloud, replacing any not yet processed.
    pub fn set_point_cloud(&mut self, sample: CloudSample) {
        if self.pending_cloud.replace(sample).is_some() {
            trace!("Unprocessed point cloud replaced");
        }
    }

    /// Queue a telecommand.
    pub fn set_tc(&mut self, tc: NavTc) {
        self.pending_tcs.push(tc);
    }

    pub fn state_est(&self) -> &StateEst {
        &self.state_est
    }

    pub fn goal(&self) -> Option<&Pose2D> {
        self.goal.as_ref()
    }

    pub fn curv_m(&self) -> f64 {
        self.curv_m
    }

    pub fn report(&self) -> &StatusReport {
        &self.report
    }

    /// Apply everything received since the last cycle.
    fn ingest(&mut self) {
        if let Some(odom) = self.pending_odom.take() {
            self.state_est.update_odometry_sample(&odom);
        }

        if let Some(fix) = self.pending_loc.take() {
            self.state_est.update_loc_fix(&fix);
        }

        // The cloud is expressed in the vehicle frame at the latest odometry
        // pose, which is the best estimate of the pose at capture. Before the
        // first odometry update there is no such pose, so the cloud is held
        // and bound to the first one.
        if self.state_est.is_ready() {
            if let Some(cloud) = self.pending_cloud.take() {
                let frame = self.state_est.state().pose;
                self.obst_anal
                    .set_point_cloud(PointCloud::from_sample(&cloud, frame));
            }
        }
        else if self.pending_cloud.is_some() {
            trace!("Point cloud held until the first odometry update");
        }

        for tc in std::mem::take(&mut self.pending_tcs) {
            self.exec_tc(tc);
        }
    }

    fn exec_tc(&mut self, tc: NavTc) {
        debug!("Executing TC: {:?}", tc);

        match tc {
            NavTc::Goal {
                x_m,
                y_m,
                heading_rad,
            } => {
                let goal = Pose2D::new(x_m, y_m, heading_rad);
                if goal.is_finite() {
                    info!("New goal: ({:.3}, {:.3}) m, {:.3} rad", x_m, y_m, heading_rad);
                    self.goal = Some(goal);
                    self.goal_reached = false;
                }
                else {
                    warn!("Non-finite goal rejected: {:?}", tc);
                }
            }
            NavTc::ClearGoal => {
                info!("Goal cleared");
                self.goal = None;
                self.goal_reached = false;
            }
            NavTc::Curv { curv_m } => {
                if curv_m.is_finite() {
                    info!("Curvature set to {:.4} 1/m", curv_m);
                    self.curv_m = curv_m;
                }
                else {
                    warn!("Non-finite curvature rejected: {}", curv_m);
                }
            }
        }
    }

    /// Odometry is stale if none has been received, or if the latest is older
    /// than the limit.
    fn is_odom_stale(&self, now: DateTime<Utc>) -> bool {
        match self.state_est.last_odom_time() {
            None => true,
            Some(t) => age_s(t, now) > self.params.max_odom_age_s,
        }
    }

    /// A cloud is stale if there is none, or if it is older than the limit.
    fn is_cloud_stale(&self, now: DateTime<Utc>) -> bool {
        match self.obst_anal.cloud() {
            None => true,
            Some(cloud) => match cloud.timestamp {
                Some(t) => age_s(t, now) > self.params.max_cloud_age_s,
                None => false,
            },
        }
    }

    /// Localisation is stale if no fix has been received, or if the latest
    /// is older than the limit.
    fn is_loc_stale(&self, now: DateTime<Utc>) -> bool {
        match self.state_est.last_loc_time() {
            None => true,
            Some(t) => age_s(t, now) > self.params.max_loc_age_s,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{lat_comp, nav_ctrl::StaleCloudPolicy, obst_anal, state_est};
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    const DT: f64 = 0.05;

    fn params(policy: StaleCloudPolicy) -> Params {
        Params {
            max_odom_age_s: 0.5,
            max_cloud_age_s: 0.5,
            max_loc_age_s: 1.0,
            stale_cloud_policy: policy,
            goal_tolerance_m: 0.1,
            initial_curv_m: 0.0,
            state_est: state_est::Params { history_len: 10 },
            obst_anal: obst_anal::Params {
                width_m: 0.4,
                length_m: 0.5,
                wheelbase_m: 0.3,
                margin_m: 0.05,
                min_curvature_m: 1e-3,
                max_range_m: 10.0,
            },
            lat_comp: lat_comp::Params { latency_s: 0.3 },
            toc_ctrl: toc_ctrl::Params {
                max_speed_ms: 1.0,
                max_accel_mss: 4.0,
                max_decel_mss: 4.0,
            },
        }
    }

    fn nav(policy: StaleCloudPolicy) -> NavCtrl {
        NavCtrl::init(InitData {
            params: params(policy),
            cycle_period_s: DT,
        })
        .unwrap()
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis(ms)
    }

    fn odom(ms: i64, x: f64, v: f64) -> OdomSample {
        OdomSample {
            timestamp: at(ms),
            loc_m: [x, 0.0],
            heading_rad: 0.0,
            vel_ms: [v, 0.0],
            ang_vel_rads: 0.0,
        }
    }

    fn step(nc: &mut NavCtrl, ms: i64) -> (DriveCmd, StatusReport) {
        nc.proc(&InputData { now: at(ms) }).unwrap()
    }

    #[test]
    fn test_halted_before_odometry() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);

        nc.set_point_cloud(CloudSample {
            timestamp: at(0),
            points_m: vec![],
        });
        nc.set_tc(NavTc::Curv { curv_m: 0.5 });

        for i in 0..5 {
            let (cmd, report) = step(&mut nc, i * 50);
            assert_eq!(cmd.vel_ms, 0.0);
            assert_eq!(report.toc_state, TocState::Halted);
            assert!(!report.ready);
        }

        assert_eq!(nc.curv_m(), 0.5);
    }

    #[test]
    fn test_stale_cloud_conservative() {
        let mut nc = nav(StaleCloudPolicy::Conservative);
        nc.set_odometry(odom(0, 0.0, 0.5));

        // No cloud at all
        let (cmd, report) = step(&mut nc, 0);
        assert!(report.cloud_stale);
        assert_eq!(report.toc_state, TocState::Decelerate);
        assert_eq!(report.free_path_m, Some(0.0));
        assert_relative_eq!(cmd.vel_ms, 0.3, epsilon = 1e-12);

        // A fresh empty cloud is clear
        nc.set_point_cloud(CloudSample {
            timestamp: at(50),
            points_m: vec![],
        });
        nc.set_odometry(odom(50, 0.0, 0.5));
        let (_, report) = step(&mut nc, 50);
        assert!(!report.cloud_stale);
        assert_eq!(report.free_path_m, None);
        assert_eq!(report.toc_state, TocState::Accelerate);

        // The same cloud later on is stale
        nc.set_odometry(odom(1000, 0.0, 0.5));
        let (_, report) = step(&mut nc, 1000);
        assert!(report.cloud_stale);
        assert_eq!(report.toc_state, TocState::Decelerate);
    }

    #[test]
    fn test_stale_cloud_optimistic() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_odometry(odom(0, 0.0, 0.5));

        let (cmd, report) = step(&mut nc, 0);
        assert!(report.cloud_stale);
        assert_eq!(report.free_path_m, None);
        assert_eq!(report.toc_state, TocState::Accelerate);
        assert_relative_eq!(cmd.vel_ms, 0.7, epsilon = 1e-12);

        // A stale cloud with an obstacle right ahead is ignored
        nc.set_point_cloud(CloudSample {
            timestamp: at(0),
            points_m: vec![[0.5, 0.0]],
        });
        nc.set_odometry(odom(2000, 0.0, 1.0));
        let (cmd, report) = step(&mut nc, 2000);
        assert!(report.cloud_stale);
        assert_eq!(report.toc_state, TocState::Cruise);
        assert_eq!(cmd.vel_ms, 1.0);
    }

    #[test]
    fn test_goal_termination() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_tc(NavTc::Goal {
            x_m: 10.0,
            y_m: 5.0,
            heading_rad: 0.0,
        });

        // Far from the goal, driving freely
        nc.set_odometry(odom(0, 0.0, 1.0));
        nc.set_localisation(LocFix {
            timestamp: at(0),
            loc_m: [5.0, 5.0],
            heading_rad: 0.0,
        });
        let (_, report) = step(&mut nc, 0);
        assert_eq!(report.toc_state, TocState::Cruise);
        assert_relative_eq!(report.goal_dist_m.unwrap(), 5.0);
        assert_eq!(report.free_path_m, Some(5.0));

        // Close enough that the goal limits the free path
        nc.set_odometry(odom(50, 0.0, 1.0));
        nc.set_localisation(LocFix {
            timestamp: at(50),
            loc_m: [9.88, 5.0],
            heading_rad: 0.0,
        });
        let (_, report) = step(&mut nc, 50);
        assert_eq!(report.toc_state, TocState::Decelerate);
        assert!(!report.goal_reached);

        // Within tolerance, the goal is reached and the vehicle stops
        nc.set_odometry(odom(100, 0.0, 0.0));
        nc.set_localisation(LocFix {
            timestamp: at(100),
            loc_m: [9.95, 5.0],
            heading_rad: 0.0,
        });
        let (cmd, report) = step(&mut nc, 100);
        assert!(report.goal_reached);
        assert_eq!(cmd.vel_ms, 0.0);

        // Stays stopped even once localisation goes stale
        nc.set_odometry(odom(5000, 0.0, 0.0));
        let (cmd, report) = step(&mut nc, 5000);
        assert!(report.loc_stale);
        assert!(report.goal_reached);
        assert_eq!(cmd.vel_ms, 0.0);

        // Clearing the goal lets the vehicle drive again
        nc.set_tc(NavTc::ClearGoal);
        nc.set_odometry(odom(5050, 0.0, 0.0));
        let (cmd, report) = step(&mut nc, 5050);
        assert_eq!(nc.goal(), None);
        assert!(!report.goal_reached);
        assert_eq!(report.toc_state, TocState::Accelerate);
        assert!(cmd.vel_ms > 0.0);
    }

    #[test]
    fn test_stale_loc_does_not_stop() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_tc(NavTc::Goal {
            x_m: 0.2,
            y_m: 0.0,
            heading_rad: 0.0,
        });
        nc.set_odometry(odom(2000, 0.0, 1.0));
        nc.set_localisation(LocFix {
            timestamp: at(0),
            loc_m: [0.0, 0.0],
            heading_rad: 0.0,
        });

        let (cmd, report) = step(&mut nc, 2000);
        assert!(report.loc_stale);
        assert_eq!(report.goal_dist_m, None);
        assert_eq!(report.toc_state, TocState::Cruise);
        assert_eq!(cmd.vel_ms, 1.0);
    }

    #[test]
    fn test_latest_sample_wins() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_input(NavInput::Odom(odom(0, 1.0, 0.0)));
        nc.set_input(NavInput::Odom(odom(10, 2.0, 0.0)));

        step(&mut nc, 10);
        assert_eq!(nc.state_est().state().pose.loc_m.x, 2.0);
        assert_eq!(nc.state_est().history().len(), 1);
    }

    #[test]
    fn test_cloud_before_odometry() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_tc(NavTc::Goal {
            x_m: 20.0,
            y_m: 0.0,
            heading_rad: 0.0,
        });

        // Lidar and localisation come up before odometry
        nc.set_point_cloud(CloudSample {
            timestamp: at(0),
            points_m: vec![[0.5, 0.0]],
        });
        nc.set_localisation(LocFix {
            timestamp: at(0),
            loc_m: [10.0, 0.0],
            heading_rad: 0.0,
        });
        let (cmd, report) = step(&mut nc, 0);
        assert_eq!(report.toc_state, TocState::Halted);
        assert_eq!(cmd.vel_ms, 0.0);
        assert_eq!(report.num_cloud_points, 0);
        assert_eq!(nc.state_est().global_pose(), Some(&Pose2D::new(10.0, 0.0, 0.0)));

        // Odometry starts well away from its origin, the obstacle must still
        // be half a meter ahead
        nc.set_odometry(odom(50, 10.0, 1.0));
        let (cmd, report) = step(&mut nc, 50);
        assert!(report.ready);
        assert!(!report.cloud_stale);
        assert_eq!(report.num_cloud_points, 1);
        assert_relative_eq!(report.free_path_m.unwrap(), 0.05, epsilon = 1e-9);
        assert_eq!(report.toc_state, TocState::Decelerate);
        assert!(cmd.vel_ms < 1.0);

        // The earlier fix still measures the goal
        assert_relative_eq!(report.goal_dist_m.unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cloud_and_odometry_same_tick() {
        let cloud = CloudSample {
            timestamp: at(50),
            points_m: vec![[1.0, 0.0]],
        };

        let mut reports = vec![];
        for cloud_first in [true, false].iter() {
            let mut nc = nav(StaleCloudPolicy::Optimistic);
            nc.set_odometry(odom(0, 0.0, 1.0));
            step(&mut nc, 0);

            if *cloud_first {
                nc.set_point_cloud(cloud.clone());
                nc.set_odometry(odom(50, 5.0, 1.0));
            }
            else {
                nc.set_odometry(odom(50, 5.0, 1.0));
                nc.set_point_cloud(cloud.clone());
            }

            let (_, report) = step(&mut nc, 50);
            reports.push(report);
        }

        // Bound to the new odometry pose in both orders, so the obstacle is a
        // meter ahead of the vehicle
        for report in reports.iter() {
            assert_eq!(report.num_cloud_points, 1);
            assert_relative_eq!(report.free_path_m.unwrap(), 0.55, epsilon = 1e-9);
        }
        assert_eq!(reports[0].toc_state, reports[1].toc_state);
    }

    #[test]
    fn test_stale_odometry_halts() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_odometry(odom(0, 0.0, 1.0));
        let (_, report) = step(&mut nc, 0);
        assert!(!report.odom_stale);
        assert_eq!(report.toc_state, TocState::Cruise);

        // Odometry stops updating for longer than the limit
        let (cmd, report) = step(&mut nc, 1000);
        assert!(report.ready);
        assert!(report.odom_stale);
        assert_eq!(report.toc_state, TocState::Halted);
        assert_eq!(cmd.vel_ms, 0.0);

        nc.set_odometry(odom(1050, 0.0, 0.0));
        let (cmd, report) = step(&mut nc, 1050);
        assert!(!report.odom_stale);
        assert_eq!(report.toc_state, TocState::Accelerate);
        assert!(cmd.vel_ms > 0.0);
    }

    #[test]
    fn test_goal_distance_predicted() {
        let mut nc = nav(StaleCloudPolicy::Optimistic);
        nc.set_tc(NavTc::Goal {
            x_m: 9.5,
            y_m: 1.0,
            heading_rad: 0.0,
        });

        // Enough history at 1 m/s to cover the whole latency
        for i in 0..6 {
            nc.set_odometry(odom(i * 50, i as f64 * 0.05, 1.0));
            step(&mut nc, i * 50);
        }

        // The map frame is a quarter turn from the odometry frame
        nc.set_odometry(odom(300, 0.3, 1.0));
        nc.set_localisation(LocFix {
            timestamp: at(300),
            loc_m: [9.5, 0.0],
            heading_rad: std::f64::consts::FRAC_PI_2,
        });
        let (_, report) = step(&mut nc, 300);

        // 0.3 m of predicted travel, along the map Y axis
        assert_relative_eq!(report.pred_x_m, 0.6, epsilon = 1e-9);
        assert_relative_eq!(report.goal_dist_m.unwrap(), 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_replay_script() {
        use std::path::PathBuf;
        use util::script_interpreter::{PendingInputs, ScriptInterpreter};

        let mut si = ScriptInterpreter::from_script(
            PathBuf::from("wall_approach.txt"),
            include_str!("../../../scripts/wall_approach.txt"),
        )
        .unwrap();

        let params: Params =
            util::params::from_str(include_str!("../../../params/nav_ctrl.toml")).unwrap();
        let mut nc = NavCtrl::init(InitData {
            params,
            cycle_period_s: DT,
        })
        .unwrap();

        let mut states = vec![];
        for i in 0.. {
            let ms = i * 50;
            match si.get_pending_inputs(ms as f64 / 1000.0) {
                PendingInputs::EndOfScript => break,
                PendingInputs::Some(inputs) => {
                    for input in inputs {
                        nc.set_input(input);
                    }
                }
                PendingInputs::None => (),
            }

            let (cmd, report) = step(&mut nc, ms);
            assert!(cmd.vel_ms >= 0.0 && cmd.vel_ms <= 1.0);
            assert!(report.ready);
            states.push(report.toc_state);
        }

        assert!(states.contains(&TocState::Accelerate));
        assert!(states.contains(&TocState::Decelerate));
        assert_eq!(nc.goal(), None);
    }

    #[test]
    fn test_wall_approach() {
        // Wall 3 m ahead of the start in the odometry frame, across the path
        const WALL_X_M: f64 = 3.0;
        let wall: Vec<[f64; 2]> = (-10..=10).map(|i| [WALL_X_M, i as f64 * 0.1]).collect();

        // Front of the unpadded body ahead of the base link
        let front_m = 0.4;

        let mut nc = nav(StaleCloudPolicy::Conservative);
        let mut x_m = 0.0;
        let mut v_ms = 0.0;
        let mut max_x_m: f64 = 0.0;
        let mut last = DriveCmd::default();

        for i in 0..400 {
            let ms = i * 50;

            nc.set_odometry(odom(ms, x_m, v_ms));
            nc.set_point_cloud(CloudSample {
                timestamp: at(ms),
                points_m: wall.iter().map(|p| [p[0] - x_m, p[1]]).collect(),
            });

            let (cmd, report) = step(&mut nc, ms);
            assert!(cmd.vel_ms >= 0.0 && cmd.vel_ms <= 1.0);
            assert!(!report.cloud_stale);

            // Vehicle follows the command exactly
            v_ms = cmd.vel_ms;
            x_m += v_ms * DT;
            max_x_m = max_x_m.max(x_m);
            last = cmd;

            assert!(x_m + front_m < WALL_X_M, "Collision at cycle {}, x = {}", i, x_m);
        }

        // Got close to the wall and stopped there
        assert!(max_x_m > WALL_X_M - front_m - 0.3);
        assert_eq!(last.vel_ms, 0.0);
        assert_eq!(nc.report().toc_state, TocState::Decelerate);
    }
}
