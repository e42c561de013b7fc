use clap::{Arg, ArgAction};

/// Character the parser reserves for separating several names of one flag
pub const ALIAS_SEPARATOR: char = ',';

pub const FLAG_HELP: &str = "help";
pub const FLAG_VERSION: &str = "version";
pub const FLAG_CUSTOM_PATH: &str = "custom-path";
pub const FLAG_CONFIG: &str = "config";
pub const FLAG_WORK_PATH: &str = "work-path";

/// Common capability of every flag kind
pub trait FlagDescriptor {
    /// Canonical name, used as the long option and the lookup id
    fn name(&self) -> &str;

    /// Alternative names; single characters become short options
    fn aliases(&self) -> &[String];

    fn usage(&self) -> &str;

    /// Build the `clap` argument declaring this flag
    fn to_arg(&self) -> Arg;
}

/// A flag taking a string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFlag {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
    pub value: Option<String>,
}

impl StringFlag {
    #[must_use]
    pub fn new(name: &str, aliases: &[&str], usage: &str) -> Self {
        StringFlag {
            name: name.to_string(),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            usage: usage.to_string(),
            value: None,
        }
    }

    /// Set the value used when the flag is absent from the command line
    #[must_use]
    pub fn with_default(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }
}

impl FlagDescriptor for StringFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.usage.clone())
            .value_name("VALUE")
            .action(ArgAction::Set);
        let arg = match &self.value {
            Some(value) => arg.default_value(value.clone()),
            None => arg,
        };
        apply_aliases(arg, &self.aliases)
    }
}

/// A switch without a value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoolFlag {
    pub name: String,
    pub aliases: Vec<String>,
    pub usage: String,
}

impl BoolFlag {
    #[must_use]
    pub fn new(name: &str, aliases: &[&str], usage: &str) -> Self {
        BoolFlag {
            name: name.to_string(),
            aliases: aliases.iter().map(ToString::to_string).collect(),
            usage: usage.to_string(),
        }
    }
}

impl FlagDescriptor for BoolFlag {
    fn name(&self) -> &str {
        &self.name
    }

    fn aliases(&self) -> &[String] {
        &self.aliases
    }

    fn usage(&self) -> &str {
        &self.usage
    }

    fn to_arg(&self) -> Arg {
        let arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .help(self.usage.clone())
            .action(ArgAction::SetTrue);
        apply_aliases(arg, &self.aliases)
    }
}

/// Any flag a command can carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flag {
    String(StringFlag),
    Bool(BoolFlag),
}

impl Flag {
    fn descriptor(&self) -> &dyn FlagDescriptor {
        match self {
            Flag::String(flag) => flag,
            Flag::Bool(flag) => flag,
        }
    }
}

impl FlagDescriptor for Flag {
    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn aliases(&self) -> &[String] {
        self.descriptor().aliases()
    }

    fn usage(&self) -> &str {
        self.descriptor().usage()
    }

    fn to_arg(&self) -> Arg {
        self.descriptor().to_arg()
    }
}

impl From<StringFlag> for Flag {
    fn from(flag: StringFlag) -> Self {
        Flag::String(flag)
    }
}

impl From<BoolFlag> for Flag {
    fn from(flag: BoolFlag) -> Self {
        Flag::Bool(flag)
    }
}

/// The first single-character alias becomes the short option, later ones short
/// aliases, and anything longer a long alias.
fn apply_aliases(mut arg: Arg, aliases: &[String]) -> Arg {
    let mut has_short = false;
    for alias in aliases {
        let mut chars = alias.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !has_short => {
                arg = arg.short(c);
                has_short = true;
            }
            (Some(c), None) => arg = arg.visible_short_alias(c),
            _ => arg = arg.visible_alias(alias.clone()),
        }
    }
    arg
}

/// Flags attached to every prepared command, built-in ones first so they lead
/// the generated help.
///
/// The path flags can be given at any level, eg: `gantry --config a.ini web
/// --config b.ini`, where the level closest to the invoked command wins. Their
/// short forms are taken for the whole tree and can't be reused by
/// subcommands.
#[must_use]
pub fn global_flags() -> Vec<Flag> {
    vec![
        BoolFlag::new(FLAG_HELP, &["h"], "Show help").into(),
        BoolFlag::new(FLAG_VERSION, &["v"], "Print the version").into(),
        StringFlag::new(
            FLAG_CUSTOM_PATH,
            &["C"],
            "Set custom path (defaults to '{WorkPath}/custom')",
        )
        .into(),
        StringFlag::new(
            FLAG_CONFIG,
            &["c"],
            "Set custom config file (defaults to '{WorkPath}/custom/conf/app.ini')",
        )
        .into(),
        StringFlag::new(
            FLAG_WORK_PATH,
            &["w"],
            "Set the working path (defaults to the binary's directory)",
        )
        .into(),
    ]
}
