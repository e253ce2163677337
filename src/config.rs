//! Compile-time configuration for the renderer and demo scene.

/// Initial window size in logical pixels.
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

/// Default camera pose and tuning.
pub const CAMERA_START_POSITION: [f32; 3] = [0.0, 0.0, 5.0];
pub const CAMERA_SPEED: f32 = 5.0;
pub const CAMERA_SENSITIVITY: f32 = 0.1;
pub const CAMERA_DEFAULT_ZOOM: f32 = 45.0;

/// Projection clip planes.
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Point-light attenuation terms shared by both orbiting lights.
pub const LIGHT_ATTENUATION_CONSTANT: f32 = 1.0;
pub const LIGHT_ATTENUATION_LINEAR: f32 = 0.022;
pub const LIGHT_ATTENUATION_QUADRATIC: f32 = 0.0019;

/// Orbit parameters for the two animated point lights.
pub const LIGHT_ORBIT_RADIUS: f32 = 3.5;
pub const LIGHT_ORBIT_SPEED: f32 = 2.0;
pub const LIGHT_ORBIT_PHASE: f32 = 2.14;
pub const LIGHT_ORBIT_TILT_DEG: f32 = 30.0;

/// Spotlight (flashlight) cone angles in degrees.
pub const SPOTLIGHT_INNER_CUTOFF_DEG: f32 = 12.5;
pub const SPOTLIGHT_OUTER_CUTOFF_DEG: f32 = 17.5;

/// Material shininess exponent used by the lit shader.
pub const MATERIAL_SHININESS: f32 = 32.0;
