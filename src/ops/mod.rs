//! Zustandslose Operationen auf Splines, Segmenten und Punktlisten.
//!
//! - `time`: natürliche ↔ uniforme Zeit, Punkte entlang der Bogenlänge
//! - `nearest`: Nächster-Punkt-, Node- und Strahl-Abfragen
//! - `corners`: Eck-Rundung der Punktliste
//! - `simplify`: Ausdünnung gerader Abschnitte

pub mod corners;
pub mod nearest;
pub mod simplify;
pub mod time;

pub use corners::add_corners;
pub use nearest::{
    closest_control_endpoint, closest_node, closest_node_to_ray, closest_point,
    closest_point_by_bisection, closest_point_on_bounds, closest_point_to_ray,
    closest_point_to_ray_on_segment, closest_sample_on_segment, closest_uniform_time,
    closest_uniform_time_xz, EndpointHit, EndpointSide, RayHit,
};
pub use simplify::simplify;
pub use time::{
    natural_to_uniform, point_at, point_at_distance, segment_point_at_distance,
    uniform_point, uniform_to_natural,
};
