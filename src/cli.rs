use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pinpoint")]
#[command(about = "Explore coordinates on a map and keep named favorite locations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep favorites in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Skip reverse geocoding network calls
    #[arg(long, global = true)]
    pub offline: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Launch the terminal interface (default)
    Tui,

    /// Validate a coordinate and print its place name
    Locate {
        /// Latitude in decimal degrees (-90 to 90)
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees (-180 to 180)
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
    },

    /// Manage favorite locations
    Favorites {
        #[command(subcommand)]
        subcommand: FavoriteCommands,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum FavoriteCommands {
    /// List saved favorites
    List,
    /// Save a favorite, replacing any existing one with the same name
    Add {
        /// Name of the favorite
        name: String,

        /// Latitude in decimal degrees (-90 to 90)
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in decimal degrees (-180 to 180)
        #[arg(long, allow_hyphen_values = true)]
        lng: String,
    },
    /// Remove a favorite by name
    Remove {
        /// Name of the favorite
        name: String,
    },
}

impl Cli {
    /// Whether this run opens the terminal interface
    pub fn is_tui(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_tui() {
        let cli = Cli::try_parse_from(["pinpoint"]).unwrap();
        assert!(cli.is_tui());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_negative_coordinates_parse() {
        let cli = Cli::try_parse_from(["pinpoint", "locate", "--lat", "-33.8688", "--lng", "151.2093"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Locate {
                lat: "-33.8688".to_string(),
                lng: "151.2093".to_string()
            })
        );
    }

    #[test]
    fn test_favorite_subcommands() {
        let cli = Cli::try_parse_from([
            "pinpoint", "favorites", "add", "Home", "--lat", "41.3111", "--lng", "69.2797", "--offline",
        ])
        .unwrap();
        assert!(cli.offline);
        assert_eq!(
            cli.command,
            Some(Commands::Favorites {
                subcommand: FavoriteCommands::Add {
                    name: "Home".to_string(),
                    lat: "41.3111".to_string(),
                    lng: "69.2797".to_string(),
                }
            })
        );

        let cli = Cli::try_parse_from(["pinpoint", "favorites", "remove", "Home"]).unwrap();
        assert!(!cli.is_tui());
    }
}
