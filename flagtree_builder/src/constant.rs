pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_SHORT: &str = "h";
pub(crate) const HELP_LONG: &str = "help";
pub(crate) const HELP_MESSAGE: &str = "Display usage";

pub(crate) const VERSION_NAME: &str = "version";
pub(crate) const VERSION_SHORT: &str = "v";
pub(crate) const VERSION_LONG: &str = "version";
pub(crate) const VERSION_MESSAGE: &str = "Display version";

pub(crate) const VERSION_EXTENDED_NAME: &str = "version_extended";
pub(crate) const VERSION_EXTENDED_LONG: &str = "vv";
pub(crate) const VERSION_EXTENDED_MESSAGE: &str = "Display version (extended)";
