//! CLI integration tests using assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn cnae_cmd() -> Command {
    Command::cargo_bin("cnae").unwrap()
}

mod validar {
    use super::*;

    #[test]
    fn test_validar_valid_codes() {
        cnae_cmd()
            .arg("validar")
            .arg("7112000")
            .arg("6201-5/00")
            .assert()
            .success()
            .stdout(predicate::str::contains("válido: 7112000"))
            .stdout(predicate::str::contains("válido: 6201500"))
            .stdout(predicate::str::contains("2 válido(s), 0 inválido(s)"));
    }

    #[test]
    fn test_validar_invalid_code_fails() {
        cnae_cmd()
            .arg("validar")
            .arg("abc")
            .assert()
            .failure()
            .stdout(predicate::str::contains("inválido: abc"))
            .stderr(predicate::str::contains("um ou mais CNAEs são inválidos"));
    }

    #[test]
    fn test_validar_mixed_codes() {
        cnae_cmd()
            .arg("validar")
            .arg("7112000")
            .arg("123")
            .assert()
            .failure()
            .stdout(predicate::str::contains("válido: 7112000"))
            .stdout(predicate::str::contains("inválido: 123"))
            .stdout(predicate::str::contains("1 válido(s), 1 inválido(s)"));
    }

    #[test]
    fn test_validar_requires_codes() {
        cnae_cmd().arg("validar").assert().failure();
    }
}

mod consolidar {
    use super::*;

    fn write_payload(name: &str, payload: &serde_json::Value) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, serde_json::to_string(payload).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_consolidar_positional_payload() {
        let path = write_payload(
            "cnae_test_positional.json",
            &serde_json::json!({
                "data": [
                    [{ "cnpj": "1" }, { "cnpj": "2" }],
                    [{ "cnpj": "3" }],
                ],
            }),
        );

        let output = cnae_cmd()
            .arg("consolidar")
            .arg(&path)
            .arg("--cnaes")
            .arg("7112000,6201500")
            .output()
            .expect("Failed to run consolidar");

        fs::remove_file(&path).ok();

        assert!(output.status.success());
        let report: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("Output should be valid JSON");
        assert_eq!(report["estatisticas"]["total_empresas"], 3);
        assert_eq!(report["empresas"][0]["cnae_consultado"], "7112000");
        assert_eq!(report["meta"]["formato"], "consolidado_unico");
    }

    #[test]
    fn test_consolidar_applies_limit() {
        let path = write_payload(
            "cnae_test_limit.json",
            &serde_json::json!({ "data": [[{ "cnpj": "1" }, { "cnpj": "2" }]] }),
        );

        let output = cnae_cmd()
            .arg("consolidar")
            .arg(&path)
            .arg("--cnaes")
            .arg("7112000")
            .arg("--limite")
            .arg("1")
            .output()
            .expect("Failed to run consolidar");

        fs::remove_file(&path).ok();

        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["resumo_por_cnae"]["7112000"]["limitado"], true);
        assert_eq!(report["resumo_por_cnae"]["7112000"]["empresas_omitidas"], 1);
    }

    #[test]
    fn test_consolidar_canonicalizes_codes() {
        let path = write_payload(
            "cnae_test_canonical.json",
            &serde_json::json!({ "data": [[{ "cnpj": "1" }]] }),
        );

        let output = cnae_cmd()
            .arg("consolidar")
            .arg(&path)
            .arg("--cnaes")
            .arg("7112-0/00")
            .output()
            .expect("Failed to run consolidar");

        fs::remove_file(&path).ok();

        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert!(report["resumo_por_cnae"]["7112000"].is_object());
    }

    #[test]
    fn test_consolidar_nonexistent_file() {
        cnae_cmd()
            .arg("consolidar")
            .arg("nao_existe.json")
            .arg("--cnaes")
            .arg("7112000")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read file"));
    }

    #[test]
    fn test_consolidar_invalid_json() {
        let path = std::env::temp_dir().join("cnae_test_invalid.json");
        fs::write(&path, "{ invalid json }").unwrap();

        cnae_cmd()
            .arg("consolidar")
            .arg(&path)
            .arg("--cnaes")
            .arg("7112000")
            .assert()
            .failure();

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_consolidar_rejects_bad_codes() {
        let path = write_payload("cnae_test_badcodes.json", &serde_json::json!({ "data": [] }));

        cnae_cmd()
            .arg("consolidar")
            .arg(&path)
            .arg("--cnaes")
            .arg("abc")
            .assert()
            .failure()
            .stderr(predicate::str::contains("CNAEs inválidos: abc"));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_consolidar_rejects_limit_above_maximum() {
        cnae_cmd()
            .arg("consolidar")
            .arg("qualquer.json")
            .arg("--cnaes")
            .arg("7112000")
            .arg("--limite")
            .arg("1001")
            .assert()
            .failure();
    }
}

mod consultar {
    use super::*;

    #[test]
    fn test_consultar_requires_codes() {
        cnae_cmd()
            .arg("consultar")
            .arg("--api-key")
            .arg("chave")
            .assert()
            .failure()
            .stderr(predicate::str::contains("informe --cnae ou --cnaes"));
    }

    #[test]
    fn test_consultar_rejects_bad_codes_before_any_network_call() {
        cnae_cmd()
            .arg("consultar")
            .arg("--api-key")
            .arg("chave")
            .arg("--cnae")
            .arg("999")
            .assert()
            .failure()
            .stderr(predicate::str::contains("CNAEs inválidos: 999"));
    }

    #[test]
    fn test_consultar_rejects_bad_tipo() {
        cnae_cmd()
            .arg("consultar")
            .arg("--api-key")
            .arg("chave")
            .arg("--cnae")
            .arg("7112000")
            .arg("--tipo")
            .arg("detalhado")
            .assert()
            .failure()
            .stderr(predicate::str::contains("tipo_resultado"));
    }

    #[test]
    fn test_consultar_unreachable_upstream() {
        cnae_cmd()
            .arg("consultar")
            .arg("--api-key")
            .arg("chave")
            .arg("--cnae")
            .arg("7112000")
            .arg("--url")
            .arg("http://127.0.0.1:1")
            .assert()
            .failure()
            .stderr(predicate::str::contains("consulta falhou (503)"));
    }

    #[test]
    fn test_consultar_conflicting_code_flags() {
        cnae_cmd()
            .arg("consultar")
            .arg("--api-key")
            .arg("chave")
            .arg("--cnae")
            .arg("7112000")
            .arg("--cnaes")
            .arg("6201500")
            .assert()
            .failure();
    }
}

mod help {
    use super::*;

    #[test]
    fn test_help_flag() {
        cnae_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("CNAE Command Line Tool"))
            .stdout(predicate::str::contains("validar"))
            .stdout(predicate::str::contains("consolidar"))
            .stdout(predicate::str::contains("consultar"));
    }

    #[test]
    fn test_version_flag() {
        cnae_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cnae"));
    }

    #[test]
    fn test_no_args_shows_help() {
        cnae_cmd()
            .assert()
            .failure()
            .stderr(predicate::str::contains("Usage"));
    }
}
