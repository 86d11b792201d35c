#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use predicates::prelude::*;
    use test_case::test_case;

    fn ngsi_command<I, S>(args: I) -> Result<assert_cmd::Command, Box<dyn std::error::Error>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut cmd = assert_cmd::Command::cargo_bin("ngsi")?;
        cmd.env_remove("NGSI_CONFIG_DIR").env_remove("RUST_LOG");
        cmd.args(args);
        Ok(cmd)
    }

    /// A config directory with a broker registry
    fn config_dir(brokers: &str) -> Result<tempfile::TempDir, Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("brokers.toml"), brokers)?;
        Ok(dir)
    }

    fn path(dir: &tempfile::TempDir) -> &str {
        dir.path().to_str().unwrap()
    }

    #[test]
    fn run_help() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = ngsi_command(["--help"])?;

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Usage"))
            .stdout(predicate::str::contains("cp"))
            .stdout(predicate::str::contains("rm"));

        Ok(())
    }

    #[test]
    fn run_version() -> Result<(), Box<dyn std::error::Error>> {
        let mut cmd = ngsi_command(["-V"])?;

        let version_string = format!("ngsi {}", env!("CARGO_PKG_VERSION"));

        cmd.assert()
            .success()
            .stdout(predicate::str::starts_with(version_string));

        Ok(())
    }

    #[test]
    fn copy_to_the_same_endpoint_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let dir = config_dir(
            r#"
            [brokers.orion]
            url = "http://localhost:1026"
            "#,
        )?;
        let mut cmd = ngsi_command([
            "--config-dir",
            path(&dir),
            "cp",
            "--host",
            "orion",
            "--host2",
            "http://localhost:1026",
            "--type",
            "Thing",
        ])?;

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("source and destination are same"));

        Ok(())
    }

    #[test_case("ld", "v2", "cannot copy entities from NGSI-LD to NGSI v2")]
    #[test_case("v2", "ld", "can't specify --ngsi-v1 option on NGSI-LD")]
    fn unsupported_copies(
        source: &str,
        destination: &str,
        error: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let dir = config_dir("")?;
        let mut cmd = ngsi_command([
            "--config-dir",
            path(&dir),
            "cp",
            "--host",
            "http://source:1026",
            "--ngsi-type",
            source,
            "--host2",
            "http://destination:1026",
            "--ngsi-type2",
            destination,
            "--type",
            "Thing",
            "--ngsiV1",
        ])?;

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains(error));

        Ok(())
    }

    #[test]
    fn unknown_broker() -> Result<(), Box<dyn std::error::Error>> {
        let dir = config_dir("")?;
        let mut cmd = ngsi_command([
            "--config-dir",
            path(&dir),
            "rm",
            "--host",
            "orion",
            "--type",
            "Thing",
        ])?;

        cmd.assert().failure().stderr(predicate::str::contains("orion"));

        Ok(())
    }

    #[test]
    fn remove_dry_run_then_remove_the_previous_host() -> Result<(), Box<dyn std::error::Error>> {
        let mut server = mockito::Server::new();
        let count = server
            .mock("GET", "/v2/entities")
            .match_header("fiware-service", "openiot")
            .match_query(Matcher::UrlEncoded("type".into(), "Thing".into()))
            .with_status(200)
            .with_header("Fiware-Total-Count", "3")
            .with_body(r#"[{"id":"a","type":"Thing"},{"id":"b","type":"Thing"},{"id":"c","type":"Thing"}]"#)
            .expect(2)
            .create();
        let deletes = server.mock("POST", Matcher::Any).expect(0).create();

        let dir = config_dir(&format!(
            r#"
            [brokers.orion]
            url = "{}"
            tenant = "openiot"
            "#,
            server.url()
        ))?;

        ngsi_command([
            "--config-dir",
            path(&dir),
            "rm",
            "--host",
            "orion",
            "--type",
            "Thing",
        ])?
        .assert()
        .success()
        .stdout("3 entities will be removed. run remove with --run option\n");

        // The broker is remembered
        ngsi_command(["--config-dir", path(&dir), "rm", "--type", "Thing"])?
            .assert()
            .success()
            .stdout("3 entities will be removed. run remove with --run option\n");

        count.assert();
        deletes.assert();
        Ok(())
    }

    #[test]
    fn copy_forgets_the_previous_host() -> Result<(), Box<dyn std::error::Error>> {
        let mut source = mockito::Server::new();
        let _count = source
            .mock("GET", "/v2/entities")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("Fiware-Total-Count", "0")
            .with_body("[]")
            .create();

        let dir = config_dir("")?;
        std::fs::write(
            dir.path().join("previous_args.toml"),
            "host = \"http://localhost:1026\"\n",
        )?;

        ngsi_command([
            "--config-dir",
            path(&dir),
            "cp",
            "--host",
            &source.url(),
            "--host2",
            "http://localhost:1026",
            "--type",
            "Thing",
        ])?
        .assert()
        .success()
        .stdout("0 entities will be copied. run copy with --run option\n");

        ngsi_command(["--config-dir", path(&dir), "rm", "--type", "Thing"])?
            .assert()
            .failure()
            .stderr(predicate::str::contains("No broker given"));

        Ok(())
    }
}
