use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("rcam-onvif")
        .version("0.1.0")
        .author("RCam Developers")
        .about("Queries and controls imaging settings of ONVIF IP cameras.")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom configuration file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("get-settings")
                .about("Fetches imaging settings from specified or all cameras")
                .arg(Arg::new("cameras").long("cameras").value_name("CAM_NAMES").help("Comma-separated list of camera names to query (default: all)").action(ArgAction::Set))
                .arg(Arg::new("token").long("token").value_name("TOKEN").help("Video source token (default: camera or application profile token)").action(ArgAction::Set)),
        )
        .subcommand(
            Command::new("invoke")
                .about("Sends a raw imaging command to one camera")
                .arg(Arg::new("camera").long("camera").value_name("CAM_NAME").required(true).help("Camera to send the command to").action(ArgAction::Set))
                .arg(Arg::new("method").long("method").value_name("METHOD").required(true).help("Imaging method name, e.g. GetStatus").action(ArgAction::Set))
                .arg(Arg::new("body").long("body").value_name("XML").help("XML fragment placed inside the method element").action(ArgAction::Set)),
        )
        .subcommand(Command::new("list-commands").about("Lists the imaging command catalog"))
        .subcommand(
            Command::new("verify-times")
                .about("Measures each camera's clock offset and compares it with the configuration")
                .arg(Arg::new("cameras").long("cameras").value_name("CAM_NAMES").help("Comma-separated list of camera names to check (default: all)").action(ArgAction::Set)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn invoke_requires_camera_and_method() {
        assert!(build_cli().try_get_matches_from(["rcam-onvif", "invoke", "--camera", "a"]).is_err());
        let matches = build_cli()
            .try_get_matches_from(["rcam-onvif", "invoke", "--camera", "a", "--method", "GetStatus"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "invoke");
        assert_eq!(sub.get_one::<String>("method").map(String::as_str), Some("GetStatus"));
    }
}
