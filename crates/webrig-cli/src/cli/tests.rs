#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;

    use clap::Parser;

    use crate::cli::{CheckMode, Cli, Command};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn build_defaults() {
        let cli = parse(&["webrig", "build"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.project.project, PathBuf::from("."));
        assert!(args.project.config.is_none());
        assert!(!args.profile);
        assert_eq!(args.mode, CheckMode::Default);

        let flags = args.flags();
        assert_eq!(flags.env(), None);
        assert!(!flags.profile());
        assert!(!flags.fast_mode());
    }

    #[test]
    fn build_flags_are_threaded_into_flags_value() {
        let cli = parse(&[
            "webrig", "build", "--env", "staging", "--profile", "--mode", "fast",
        ]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        let flags = args.flags();
        assert_eq!(flags.env(), Some("staging"));
        assert!(flags.profile());
        assert!(flags.fast_mode());
    }

    #[test]
    fn build_budget_overrides() {
        let cli = parse(&[
            "webrig",
            "build",
            "--max-entry-point-kilo-byte",
            "2000",
            "--index-name",
            "main",
        ]);
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        let overrides = args.overrides(true);
        assert_eq!(overrides.max_entry_point_kilo_byte, Some(2000));
        assert_eq!(overrides.max_asset_kilo_byte, None);
        assert_eq!(overrides.index_name.as_deref(), Some("main"));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(args.overrides(false).verbose, None);
    }

    #[test]
    fn dev_defaults() {
        let cli = parse(&["webrig", "dev"]);
        let Command::Dev(args) = cli.command else {
            panic!("expected dev");
        };
        assert_eq!(args.port, 3000);
        assert_eq!(args.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(args.proxy_target.is_none());
        assert!(args.proxy_context.is_empty());
        assert!(!args.https);
    }

    #[test]
    fn dev_https_flag() {
        let Command::Dev(args) = parse(&["webrig", "dev", "--https"]).command else {
            panic!("expected dev");
        };
        assert!(args.https);
    }

    #[test]
    fn dev_proxy_rules() {
        let cli = parse(&[
            "webrig",
            "dev",
            "--proxy-target",
            "https://api.example.com",
            "--proxy-context",
            "/api",
            "--proxy-context",
            "/auth",
        ]);
        let Command::Dev(args) = cli.command else {
            panic!("expected dev");
        };
        assert_eq!(args.proxy_target.as_deref(), Some("https://api.example.com"));
        assert_eq!(args.proxy_context, ["/api", "/auth"]);
    }

    #[test]
    fn proxy_context_requires_target() {
        assert!(Cli::try_parse_from(["webrig", "dev", "--proxy-context", "/api"]).is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["webrig", "--verbose", "--quiet", "build"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["webrig", "build", "--verbose", "--no-color"]);
        assert!(cli.verbose);
        assert!(cli.no_color);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["webrig", "build", "--mode", "turbo"]).is_err());
    }
}
