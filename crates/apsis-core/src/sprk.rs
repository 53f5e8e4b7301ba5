//! Symplectic partitioned Runge–Kutta integration.
//!
//! Propagates Hamiltonian (position/momentum) systems over very large
//! numbers of fixed steps. The stage loop follows the
//! "SymplecticPartitionedRungeKutta" method notes for Mathematica's NDSolve
//! (algorithm 3 for the stages, algorithm 2 for the compensated step
//! summation); schemes whose first b or last a coefficient vanishes are
//! rewritten at construction into first-same-as-last (FSAL) form, folding
//! one stage of each step into its neighbour.
//!
//! The integrator is dimension-agnostic: it never touches the multivector
//! layer and works on flat arrays of generic position and momentum
//! quantities.

use std::marker::PhantomData;
use std::mem;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MAX_LAST_INTERVAL_FACTOR;
use crate::double_precision::DoublePrecision;
use crate::quantity::{Time, Variation};

/// The paired coefficient sequences of a symplectic partitioned Runge–Kutta
/// scheme, one entry per stage: `a` weights the position updates, `b` the
/// momentum updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scheme {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

macro_rules! scheme {
    ($(#[$attribute:meta])* $name:ident, $a:expr, $b:expr) => {
        $(#[$attribute])*
        pub fn $name() -> &'static Scheme {
            static SCHEME: LazyLock<Scheme> = LazyLock::new(|| Scheme { a: $a, b: $b });
            &SCHEME
        }
    };
}

impl Scheme {
    scheme!(
        /// Second order, two stages.
        leapfrog,
        vec![0.5, 0.5],
        vec![0.0, 1.0]
    );

    scheme!(
        /// Second order, two stages, with the roles of the sequences
        /// exchanged with respect to [`leapfrog`](Scheme::leapfrog).
        pseudo_leapfrog,
        vec![1.0, 0.0],
        vec![0.5, 0.5]
    );

    scheme!(
        /// Second order, two stages. McLachlan and Atela (1992),
        /// The accuracy of symplectic integrators.
        mclachlan_atela_1992_order_2_optimal,
        vec![0.7071067811865475244, 0.2928932188134524756],
        vec![0.2928932188134524756, 0.7071067811865475244]
    );

    scheme!(
        /// Third order, three stages. Ruth (1983), A canonical integration
        /// technique.
        ruth_1983,
        vec![2. / 3., -2. / 3., 1.],
        vec![7. / 24., 3. / 4., -1. / 24.]
    );

    scheme!(
        /// Third order, three stages.
        mclachlan_atela_1992_order_3_optimal,
        vec![
            0.9196615230173998571,
            -0.1879916187991597820,
            0.2683300957817599250
        ],
        vec![
            0.2683300957817599250,
            -0.1879916187991597820,
            0.9196615230173998571
        ]
    );

    scheme!(
        /// Fourth order, four stages; momenta are synchronous with the
        /// positions at step boundaries. Candy and Rozmus (1991),
        /// Forest and Ruth (1990).
        candy_rozmus_1991_forest_ruth_1990_synchronous_momenta,
        vec![
            0.6756035959798288170,
            -0.1756035959798288170,
            -0.1756035959798288170,
            0.6756035959798288170
        ],
        vec![
            0.0,
            1.351207191959657634,
            -1.702414383919315268,
            1.351207191959657634
        ]
    );

    scheme!(
        /// Fourth order, four stages; the synchronous-positions variant.
        candy_rozmus_1991_forest_ruth_1990_synchronous_positions,
        vec![
            1.3512071919596576340,
            -1.7024143839193152681,
            1.3512071919596576340,
            0.0
        ],
        vec![
            0.6756035959798288170,
            -0.1756035959798288170,
            -0.1756035959798288170,
            0.6756035959798288170
        ]
    );

    scheme!(
        /// Fourth order, four stages.
        mclachlan_atela_1992_order_4_optimal,
        vec![
            0.5153528374311229364,
            -0.085782019412973646,
            0.4415830236164665242,
            0.1288461583653841854
        ],
        vec![
            0.1344961992774310892,
            -0.2248198030794208058,
            0.7563200005156682911,
            0.3340036032863214255
        ]
    );

    scheme!(
        /// Fifth order, six stages.
        mclachlan_atela_1992_order_5_optimal,
        vec![
            0.339839625839110000,
            -0.088601336903027329,
            0.5858564768259621188,
            -0.603039356536491888,
            0.3235807965546976394,
            0.4423637942197494587
        ],
        vec![
            0.1193900292875672758,
            0.6989273703824752308,
            -0.1713123582716007754,
            0.4012695022513534480,
            0.0107050818482359840,
            -0.0589796254980311632
        ]
    );

    scheme!(
        /// Sixth order, eight stages. Yoshida (1990), Construction of
        /// higher order symplectic integrators, solution A.
        yoshida_1990_order_6_a,
        vec![
            0.78451361047755726382,
            0.23557321335935813369,
            -1.17767998417887100695,
            1.31518632068391121889,
            -1.17767998417887100695,
            0.23557321335935813369,
            0.78451361047755726382,
            0.0
        ],
        vec![
            0.392256805238778631910,
            0.51004341191845769875,
            -0.47105338540975643663,
            0.06875316825252010597,
            0.06875316825252010597,
            -0.47105338540975643663,
            0.51004341191845769875,
            0.392256805238778631910
        ]
    );

    scheme!(
        /// Sixth order, eight stages, solution B.
        yoshida_1990_order_6_b,
        vec![
            1.43984816797678309102,
            0.00426068187079201616,
            -2.13228522200145152088,
            2.37635274430775282740,
            -2.13228522200145152088,
            0.00426068187079201616,
            1.43984816797678309102,
            0.0
        ],
        vec![
            0.71992408398839154551,
            0.72205442492378755359,
            -1.06401227006532975236,
            0.12203376115315065326,
            0.12203376115315065326,
            -1.06401227006532975236,
            0.72205442492378755359,
            0.71992408398839154551
        ]
    );

    scheme!(
        /// Sixth order, eight stages, solution C.
        yoshida_1990_order_6_c,
        vec![
            1.44778256239929793290,
            -2.14403531630538931060,
            0.00152886228424927025338,
            2.38944778324368421490,
            0.00152886228424927025338,
            -2.14403531630538931060,
            1.44778256239929793290,
            0.0
        ],
        vec![
            0.72389128119964896645,
            -0.34812637695304568885,
            -1.07125322701057002017,
            1.19548832276396674257,
            1.19548832276396674257,
            -1.07125322701057002017,
            -0.34812637695304568885,
            0.72389128119964896645
        ]
    );

    scheme!(
        /// Eighth order, sixteen stages, solution A.
        yoshida_1990_order_8_a,
        vec![
            1.04242620869970426435,
            1.82020630970698006933,
            0.157739928123708321343,
            2.44002732616634406382,
            -0.00716989419709533209981,
            -2.44699182370424588929,
            -1.61582374150065378479,
            -1.7808286265894834253,
            -1.61582374150065378479,
            -2.44699182370424588929,
            -0.00716989419709533209981,
            2.44002732616634406382,
            0.157739928123708321343,
            1.82020630970698006933,
            1.04242620869970426435,
            0.0
        ],
        vec![
            0.521213104349852132174,
            1.43131625920334216684,
            0.988973118915344195337,
            1.29888362714502619258,
            1.21642871598462436586,
            -1.22708085895067061070,
            -2.03140778260244983704,
            -1.6983261840450686051,
            -1.6983261840450686051,
            -2.03140778260244983704,
            -1.22708085895067061070,
            1.21642871598462436586,
            1.29888362714502619258,
            0.988973118915344195337,
            1.43131625920334216684,
            0.521213104349852132174
        ]
    );

    scheme!(
        /// Eighth order, sixteen stages, solution B.
        yoshida_1990_order_8_b,
        vec![
            1.48819229202921310080,
            -2.33864815101041943098,
            2.89105148972198900311,
            -2.89688250330423987105,
            0.00378039588362668223674,
            2.89195744315817391244,
            -0.00169248587771706559145,
            -3.0755169612012526619,
            -0.00169248587771706559145,
            2.89195744315817391244,
            0.00378039588362668223674,
            -2.89688250330423987105,
            2.89105148972198900311,
            -2.33864815101041943098,
            1.48819229202921310080,
            0.0
        ],
        vec![
            0.744096146014606550401,
            -0.42522792949060316509,
            0.27620166935578478606,
            -0.00291550679112543397,
            -1.44655105371030659441,
            1.44786891952090029734,
            1.44513247864022842343,
            -1.5386047235394848638,
            -1.5386047235394848638,
            1.44513247864022842343,
            1.44786891952090029734,
            -1.44655105371030659441,
            -0.00291550679112543397,
            0.27620166935578478606,
            -0.42522792949060316509,
            0.744096146014606550401
        ]
    );

    scheme!(
        /// Eighth order, sixteen stages, solution C.
        yoshida_1990_order_8_c,
        vec![
            0.629030650210427818049,
            1.36934946416874222370,
            -1.06458714789183904181,
            1.66335809963311356298,
            -1.67896928259637402925,
            -1.55946803821449795876,
            0.311790812418431890510,
            1.6589908845439910692,
            0.311790812418431890510,
            -1.55946803821449795876,
            -1.67896928259637402925,
            1.66335809963311356298,
            -1.06458714789183904181,
            1.36934946416874222370,
            0.629030650210427818049,
            0.0
        ],
        vec![
            0.314515325105213909024,
            0.999190057189585020872,
            0.15238115813845159094,
            0.29938547587063726059,
            -0.00780559148163023314,
            -1.61921866040543599400,
            -0.623838612898033034124,
            0.98539084848121147984,
            0.98539084848121147984,
            -0.623838612898033034124,
            -1.61921866040543599400,
            -0.00780559148163023314,
            0.29938547587063726059,
            0.15238115813845159094,
            0.999190057189585020872,
            0.314515325105213909024
        ]
    );

    scheme!(
        /// Eighth order, sixteen stages, solution D.
        yoshida_1990_order_8_d,
        vec![
            0.914844246229642658287,
            0.253693336566286009974,
            -1.44485223686030647660,
            -0.158240635368502468458,
            1.93813913762291232471,
            -1.96061023297558163691,
            0.102799849392219431139,
            1.7084530707866603157,
            0.102799849392219431139,
            -1.96061023297558163691,
            1.93813913762291232471,
            -0.158240635368502468458,
            -1.44485223686030647660,
            0.253693336566286009974,
            0.914844246229642658287,
            0.0
        ],
        vec![
            0.457422123114821329143,
            0.584268791397964334130,
            -0.595579450147010233314,
            -0.801546436114404472530,
            0.88994925112720492813,
            -0.01123554767633465610,
            -0.92890519179168110289,
            0.90562646008943987343,
            0.90562646008943987343,
            -0.92890519179168110289,
            -0.01123554767633465610,
            0.88994925112720492813,
            -0.801546436114404472530,
            -0.595579450147010233314,
            0.584268791397964334130,
            0.457422123114821329143
        ]
    );

    scheme!(
        /// Eighth order, sixteen stages, solution E.
        yoshida_1990_order_8_e,
        vec![
            1.30300165757516838484,
            0.107990467718098279648,
            -2.04809795883490205633,
            0.00536018921375238082832,
            -0.0719180053650705075005,
            2.52778927318028339169,
            0.0227738840126312259937,
            -2.6937990149999221983,
            0.0227738840126312259937,
            2.52778927318028339169,
            -0.0719180053650705075005,
            0.00536018921375238082832,
            -2.04809795883490205633,
            0.107990467718098279648,
            1.30300165757516838484,
            0.0
        ],
        vec![
            0.651500828787584192418,
            0.705496062646633332241,
            -0.97005374555840188834,
            -1.02136888481057483775,
            -0.0332789080756590633361,
            1.22793563390760644210,
            1.27528157859645730884,
            -1.33551256549364548617,
            -1.33551256549364548617,
            1.27528157859645730884,
            1.22793563390760644210,
            -0.0332789080756590633361,
            -1.02136888481057483775,
            -0.97005374555840188834,
            0.705496062646633332241,
            0.651500828787584192418
        ]
    );
}

/// FSAL classification of a scheme, fixed at integrator construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VanishingCoefficients {
    /// Generic stage loop, no folding.
    None,
    /// The first b coefficient is zero: the first momentum stage of a step
    /// is the last of the previous one.
    FirstBVanishes,
    /// The last a coefficient is zero: the last position stage of a step is
    /// the first of the next one.
    LastAVanishes,
}

#[derive(Clone, Copy, Debug, Default)]
struct FirstSameAsLast {
    first: f64,
    last: f64,
}

/// One sampled trajectory point: a compensated time and, per degree of
/// freedom, a compensated position and momentum.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemState<Q, P> {
    pub time: DoublePrecision<Time>,
    pub positions: Vec<DoublePrecision<Q>>,
    pub momenta: Vec<DoublePrecision<P>>,
}

/// The inputs of a fixed-step integration run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Parameters<Q, P> {
    /// Initial compensated positions, momenta and time.
    pub initial: SystemState<Q, P>,
    /// Nominal step.
    pub delta_t: Time,
    /// End time of the integration.
    pub tmax: Time,
    /// Whether to land exactly on `tmax` by adjusting the length of the
    /// last interval, rather than stopping at the last multiple of
    /// `delta_t` before it.
    pub tmax_is_exact: bool,
    /// Append a state to the solution every `sampling_period` steps; 0
    /// records only the final state.
    pub sampling_period: usize,
}

/// A symplectic partitioned Runge–Kutta integrator over positions of type
/// `Q` and momenta of type `P`.
///
/// The coefficient tables are fixed at construction and read-only
/// afterwards; a single instance may be shared across threads running
/// independent integrations.
pub struct SprkIntegrator<Q, P> {
    a: Vec<f64>,
    b: Vec<f64>,
    /// Runge–Kutta time weights, derived from `a` at construction.
    c: Vec<f64>,
    stages: usize,
    vanishing_coefficients: VanishingCoefficients,
    first_same_as_last: FirstSameAsLast,
    kinds: PhantomData<(Q, P)>,
}

impl<Q, P> SprkIntegrator<Q, P> {
    /// Builds an integrator for `scheme`, rewriting it into FSAL form when
    /// its first b or last a coefficient vanishes.
    ///
    /// # Panics
    ///
    /// Panics if the scheme is empty or its sequences end up with different
    /// lengths: a malformed scheme is a configuration bug and continuing
    /// would silently corrupt a long-running integration.
    pub fn new(scheme: &Scheme) -> Self {
        assert!(
            !scheme.a.is_empty() && !scheme.b.is_empty(),
            "empty coefficient scheme"
        );
        let vanishing_coefficients;
        let first_same_as_last;
        let mut a;
        let mut b;
        if scheme.b[0] == 0.0 {
            vanishing_coefficients = VanishingCoefficients::FirstBVanishes;
            first_same_as_last = FirstSameAsLast {
                first: scheme.a[0],
                last: scheme.a[scheme.a.len() - 1],
            };
            a = scheme.a[1..].to_vec();
            b = scheme.b[1..].to_vec();
            assert!(!a.is_empty(), "scheme degenerates to zero stages");
            let folded = a.len() - 1;
            a[folded] += first_same_as_last.first;
        } else if scheme.a[scheme.a.len() - 1] == 0.0 {
            vanishing_coefficients = VanishingCoefficients::LastAVanishes;
            first_same_as_last = FirstSameAsLast {
                first: scheme.b[0],
                last: scheme.b[scheme.b.len() - 1],
            };
            a = scheme.a[..scheme.a.len() - 1].to_vec();
            b = scheme.b[..scheme.b.len() - 1].to_vec();
            assert!(!b.is_empty(), "scheme degenerates to zero stages");
            b[0] += first_same_as_last.last;
        } else {
            vanishing_coefficients = VanishingCoefficients::None;
            first_same_as_last = FirstSameAsLast::default();
            a = scheme.a.clone();
            b = scheme.b.clone();
        }
        let stages = b.len();
        assert_eq!(
            stages,
            a.len(),
            "coefficient sequences must have equal length"
        );

        // Runge–Kutta time weights.
        let mut c = vec![0.0; stages];
        c[0] = match vanishing_coefficients {
            VanishingCoefficients::FirstBVanishes => first_same_as_last.first,
            _ => 0.0,
        };
        for j in 1..stages {
            c[j] = c[j - 1] + a[j - 1];
        }

        debug!(
            stages,
            ?vanishing_coefficients,
            "initialized symplectic partitioned Runge-Kutta scheme"
        );

        Self {
            a,
            b,
            c,
            stages,
            vanishing_coefficients,
            first_same_as_last,
            kinds: PhantomData,
        }
    }

    /// The FSAL classification performed at construction.
    pub fn vanishing_coefficients(&self) -> VanishingCoefficients {
        self.vanishing_coefficients
    }

    /// Number of stages per step after FSAL folding.
    pub fn stages(&self) -> usize {
        self.stages
    }
}

impl<Q, P> SprkIntegrator<Q, P>
where
    Q: Copy + Default + Add<Output = Q> + Sub<Output = Q> + Div<Time>,
    P: Copy + Default + Add<Output = P> + Sub<Output = P> + Div<Time>,
    Variation<Q>: Copy + Default + Mul<Time, Output = Q>,
    Variation<P>: Copy + Default + Mul<Time, Output = P>,
{
    /// Integrates the system from `parameters.initial` to `parameters.tmax`
    /// and appends the sampled [`SystemState`]s to `solution`, time
    /// ascending.
    ///
    /// `compute_force` is evaluated at stage-adjusted times and must fill
    /// its out-slice with the momentum variations; `compute_velocity` is
    /// autonomous and fills the position variations. Both must be pure
    /// functions of their inputs; the out-slices are pre-sized to the
    /// system's dimension.
    ///
    /// # Panics
    ///
    /// Panics if the initial positions and momenta differ in length.
    pub fn solve<ComputeForce, ComputeVelocity>(
        &self,
        mut compute_force: ComputeForce,
        mut compute_velocity: ComputeVelocity,
        parameters: &Parameters<Q, P>,
        solution: &mut Vec<SystemState<Q, P>>,
    ) where
        ComputeForce: FnMut(Time, &[Q], &mut [Variation<P>]),
        ComputeVelocity: FnMut(&[P], &mut [Variation<Q>]),
    {
        let dimension = parameters.initial.positions.len();
        assert_eq!(
            dimension,
            parameters.initial.momenta.len(),
            "positions and momenta must have the same dimension"
        );

        let capacity = if parameters.sampling_period == 0 {
            1
        } else {
            let steps =
                f64::from((parameters.tmax - parameters.initial.time.value) / parameters.delta_t);
            ((steps + 1.0) / parameters.sampling_period as f64).ceil() as usize + 1
        };
        solution.clear();
        solution.reserve(capacity);

        let mut delta_q_current = vec![Q::default(); dimension];
        let mut delta_q_previous = vec![Q::default(); dimension];
        let mut delta_p_current = vec![P::default(); dimension];
        let mut delta_p_previous = vec![P::default(); dimension];

        let mut q_last = parameters.initial.positions.clone();
        let mut p_last = parameters.initial.momenta.clone();
        let mut sampling_phase: usize = 0;

        let mut q_stage = vec![Q::default(); dimension];
        let mut p_stage = vec![P::default(); dimension];
        let mut force = vec![Variation::<P>::default(); dimension];
        let mut velocity = vec![Variation::<Q>::default(); dimension];

        // The length of the current interval; equal to delta_t except
        // possibly on the last interval when tmax is exact.
        let mut h = parameters.delta_t;

        // Start of the interval currently processed, as a compensated sum
        // so that the time variable does not drift over millions of steps.
        let mut tn = parameters.initial.time;

        // Whether position and momentum refer to the same instant. Time is
        // always synchronous with position. FSAL folding deliberately lets
        // the two drift apart inside a run and resynchronizes them at
        // sampling boundaries and at the end.
        let mut q_and_p_are_synchronized = true;
        let mut should_synchronize = false;

        let first_same_as_last = self.first_same_as_last;

        let mut at_end = !parameters.tmax_is_exact && parameters.tmax < tn.value + h;
        while !at_end {
            // Check whether this is the last interval.
            if parameters.tmax_is_exact {
                // Once tn gets within MAX_LAST_INTERVAL_FACTOR nominal
                // steps of tmax, land on tmax exactly; the last interval
                // then has a length between 0.5 and 1.5 nominal steps
                // rather than becoming arbitrarily small.
                if parameters.tmax <= tn.value + h * MAX_LAST_INTERVAL_FACTOR {
                    at_end = true;
                    h = (parameters.tmax - tn.value) - tn.error;
                }
            } else if parameters.tmax < tn.value + h * 2.0 {
                // The next interval would overshoot: make this the last
                // one but keep the nominal step.
                at_end = true;
            }

            for k in 0..dimension {
                delta_q_current[k] = Q::default();
                delta_p_current[k] = P::default();
                q_stage[k] = q_last[k].value;
            }

            if self.vanishing_coefficients != VanishingCoefficients::None {
                should_synchronize = at_end
                    || (parameters.sampling_period != 0
                        && sampling_phase % parameters.sampling_period == 0);
            }

            if self.vanishing_coefficients == VanishingCoefficients::FirstBVanishes
                && q_and_p_are_synchronized
            {
                // Desynchronize: push the positions ahead by the folded
                // leading stage.
                mem::swap(&mut delta_q_current, &mut delta_q_previous);
                for k in 0..dimension {
                    p_stage[k] = p_last[k].value;
                }
                compute_velocity(&p_stage, &mut velocity);
                advance_stage(
                    first_same_as_last.first * h,
                    &velocity,
                    &q_last,
                    &mut q_stage,
                    &delta_q_previous,
                    &mut delta_q_current,
                );
                q_and_p_are_synchronized = false;
            }

            for i in 0..self.stages {
                mem::swap(&mut delta_q_current, &mut delta_q_previous);
                mem::swap(&mut delta_p_current, &mut delta_p_previous);

                // The momentum update reads the position stage left by the
                // previous iteration and the position update reads the
                // momentum stage just written: the order matters.
                if self.vanishing_coefficients == VanishingCoefficients::LastAVanishes
                    && q_and_p_are_synchronized
                    && i == 0
                {
                    compute_force(tn.value, &q_stage, &mut force);
                    advance_stage(
                        first_same_as_last.first * h,
                        &force,
                        &p_last,
                        &mut p_stage,
                        &delta_p_previous,
                        &mut delta_p_current,
                    );
                    q_and_p_are_synchronized = false;
                } else {
                    // Adding tn.error nudges the stage time a little closer
                    // to the exact accumulated time.
                    compute_force(tn.value + (tn.error + h * self.c[i]), &q_stage, &mut force);
                    advance_stage(
                        h * self.b[i],
                        &force,
                        &p_last,
                        &mut p_stage,
                        &delta_p_previous,
                        &mut delta_p_current,
                    );
                }

                compute_velocity(&p_stage, &mut velocity);
                if self.vanishing_coefficients == VanishingCoefficients::FirstBVanishes
                    && should_synchronize
                    && i == self.stages - 1
                {
                    // Resynchronize: the trailing position stage uses the
                    // unfolded coefficient.
                    advance_stage(
                        first_same_as_last.last * h,
                        &velocity,
                        &q_last,
                        &mut q_stage,
                        &delta_q_previous,
                        &mut delta_q_current,
                    );
                    q_and_p_are_synchronized = true;
                } else {
                    advance_stage(
                        h * self.a[i],
                        &velocity,
                        &q_last,
                        &mut q_stage,
                        &delta_q_previous,
                        &mut delta_q_current,
                    );
                }
            }

            if self.vanishing_coefficients == VanishingCoefficients::LastAVanishes
                && should_synchronize
            {
                // Resynchronize: fold the trailing momentum stage back in.
                mem::swap(&mut delta_p_current, &mut delta_p_previous);
                compute_force(tn.value + h, &q_stage, &mut force);
                advance_stage(
                    first_same_as_last.last * h,
                    &force,
                    &p_last,
                    &mut p_stage,
                    &delta_p_previous,
                    &mut delta_p_current,
                );
                q_and_p_are_synchronized = true;
            }

            // Compensated summation of the step deltas.
            for k in 0..dimension {
                q_last[k].increment(delta_q_current[k]);
                p_last[k].increment(delta_p_current[k]);
                q_stage[k] = q_last[k].value;
                p_stage[k] = p_last[k].value;
            }
            tn.increment(h);

            if parameters.sampling_period != 0 {
                if sampling_phase % parameters.sampling_period == 0 {
                    solution.push(SystemState {
                        time: tn,
                        positions: q_last.clone(),
                        momenta: p_last.clone(),
                    });
                }
                sampling_phase += 1;
            }
        }

        if parameters.sampling_period == 0 {
            solution.push(SystemState {
                time: tn,
                positions: q_last,
                momenta: p_last,
            });
        }
    }
}

/// One stage update, shared by the position and momentum phases: folds
/// `step × rhs` into the running stage delta and refreshes the stage values
/// from the compensated sums.
fn advance_stage<T, V>(
    step: Time,
    rhs: &[V],
    last: &[DoublePrecision<T>],
    stage: &mut [T],
    delta_previous: &[T],
    delta_current: &mut [T],
) where
    T: Copy + Add<Output = T>,
    V: Copy + Mul<Time, Output = T>,
{
    for k in 0..stage.len() {
        let delta = delta_previous[k] + rhs[k] * step;
        stage[k] = last[k].value + delta;
        delta_current[k] = delta;
    }
}
