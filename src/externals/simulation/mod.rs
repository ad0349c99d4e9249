pub mod adapters;
pub mod services;
pub mod task;

/// Distance to target readings, in millimeters, recorded from one electrode
/// descent. Sampled every 500 ms.
pub const RECORDED_DESCENT_MM: [f32; 47] = [
    9.499, 9.499, 9.499, 9.499, 9.499, 9.499, 9.499, 9.499, 9.499, 9.499, 7.491, 6.990, 6.487,
    5.986, 5.483, 4.980, 4.479, 3.977, 3.475, 2.974, 2.473, 1.970, 1.468, 0.967, 0.467, 0.466,
    -0.027, -0.035, -0.538, -1.039, -1.541, -3.033, -3.033, -3.033, -3.033, -3.033, -3.033,
    -3.033, -3.033, -3.033, -3.033, -3.033, -3.033, -3.033, -3.033, -3.033, -3.033,
];
