/// Fatal configuration problems, surfaced once at startup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "window width {width} cannot fit a {platform_width}-wide platform with {padding} padding on each side"
    )]
    WindowTooNarrow {
        width: f32,
        platform_width: f32,
        padding: f32,
    },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and not negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f32 },
    #[error("{name} floor {floor} exceeds its cap {cap}")]
    FloorAboveCap {
        name: &'static str,
        floor: f32,
        cap: f32,
    },
    #[error("moving platform speed range [{min}, {max}) is empty")]
    EmptySpeedRange { min: f32, max: f32 },
    #[error("jump apex {apex:.1} cannot clear the platform gap {gap}")]
    UnreachableGap { apex: f32, gap: f32 },
}
