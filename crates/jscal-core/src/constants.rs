/// Member of an object node that names its type.
pub const TYPE_KEY: &str = "@type";

/// Separator between segments of a patch path.
pub const PATH_SEPARATOR: char = '/';

/// Form of a `LocalDateTime` value. Fractional seconds are optional on input
/// and written only when non-zero.
pub const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Settings sources
pub const ENV_PREFIX: &str = "JSCAL";
pub const CONFIG_FILE_STEM: &str = "jscal";
pub const CONFIG_FILE: &str = const_str::concat!(CONFIG_FILE_STEM, ".toml");
