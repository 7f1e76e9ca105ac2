
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use support_stub::{describe, run_barrage, spawn_stub_service_or_skip};

const OK_REPLY: &str = "<result>accepted</result>";
const ERROR_REPLY: &str = "<result>Error: configuration rejected</result>";

const SAP_HEADER: &str = "BAMType,BAMUniqueID,TransactionId,ReportName,DynproNumber,ServerName,\
TimeStamp,IpAddress,SapUser,TerminalId,ConnectionType,UserName";

fn write_event_file(dir: &Path, name: &str, events: u32) -> Result<PathBuf, String> {
    let mut lines = vec![SAP_HEADER.to_owned()];
    for id in 1..=events {
        lines.push(format!(
            "SAP R3,{},T{},Z_REPORT,0100,srv01,10/06/2009 17:46:11,10.0.0.{},sap,term,rfc,user{}",
            id, id, id, id
        ));
    }
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).map_err(|err| format!("write {} failed: {}", name, err))?;
    Ok(path)
}

fn read_lines(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|err| format!("read {} failed: {}", path.display(), err))?;
    Ok(content.lines().map(str::to_owned).collect())
}

/// Result files in `dir` whose name ends with `suffix`, sorted by name.
fn result_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, String> {
    let mut found = Vec::new();
    let entries = fs::read_dir(dir).map_err(|err| format!("read_dir failed: {}", err))?;
    for entry in entries {
        let path = entry
            .map_err(|err| format!("dir entry failed: {}", err))?
            .path();
        let matches = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(suffix))
            .unwrap_or(false);
        if matches {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

#[test]
fn e2e_events_send_full_batches_per_file() -> Result<(), String> {
    let Some((url, server)) = spawn_stub_service_or_skip(OK_REPLY)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let out = dir.path().join("out");

    let mut listed = Vec::new();
    for name in ["first.csv", "second.csv", "third.csv"] {
        let path = write_event_file(dir.path(), name, 4)?;
        listed.push(path.to_string_lossy().into_owned());
    }
    // Blank lines in the index are ignored.
    listed.push(String::new());
    let index = dir.path().join("index.txt");
    fs::write(&index, listed.join("\n")).map_err(|err| format!("write index failed: {}", err))?;

    let output = run_barrage(
        dir.path(),
        [
            "events".to_owned(),
            index.to_string_lossy().into_owned(),
            "2".to_owned(),
            "0".to_owned(),
            "--endpoint".to_owned(),
            url,
            "--output-dir".to_owned(),
            out.to_string_lossy().into_owned(),
        ],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    for name in ["first.csv", "second.csv", "third.csv"] {
        let rows = read_lines(&out.join(format!("{}_results_.csv", name)))?;
        if rows.len() != 3 {
            return Err(format!("{}: expected header and two rows, got {:?}", name, rows));
        }
        if rows.first().map(String::as_str)
            != Some("timestamp (dd/MM/yyyy HH:mm:ss.fff),milliseconds to process request")
        {
            return Err(format!("{}: unexpected header {:?}", name, rows.first()));
        }
        if rows.iter().skip(1).any(|row| row.contains("ERROR")) {
            return Err(format!("{}: unexpected error rows {:?}", name, rows));
        }
    }

    let received = server.received()?;
    if received.len() != 6 {
        return Err(format!("expected 6 requests, got {}", received.len()));
    }
    for request in &received {
        if request.target != "/wbx/events" {
            return Err(format!("unexpected target {}", request.target));
        }
        if !request.body.contains("<attribute name=\"BAMType\" value=\"SAP R3\" />")
            || !request.body.contains("<event eventId=\"2\">")
        {
            return Err(format!("unexpected payload {}", request.body));
        }
    }
    Ok(())
}

#[test]
fn e2e_health_writes_labelled_rows_per_worker() -> Result<(), String> {
    let Some((url, server)) = spawn_stub_service_or_skip(OK_REPLY)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_barrage(
        dir.path(),
        ["health", "2", "2", "2", "0", "--endpoint", url.as_str()],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let files = result_files(dir.path(), ".csv")?;
    if files.len() != 2 {
        return Err(format!("expected two result files, got {:?}", files));
    }
    for file in &files {
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !name.starts_with("Health Generator ") || !name.contains("_thread_") {
            return Err(format!("unexpected result file name {}", name));
        }
        let rows = read_lines(file)?;
        if rows.len() != 11 {
            return Err(format!("{}: expected header and ten rows, got {}", name, rows.len()));
        }
        if rows.first().map(String::as_str)
            != Some("timestamp (dd/MM/yyyy HH:mm:ss.fff),agent uid,milliseconds to process request")
        {
            return Err(format!("{}: unexpected header {:?}", name, rows.first()));
        }
        let labels: Vec<&str> = rows
            .iter()
            .skip(1)
            .filter_map(|row| row.split(',').nth(1))
            .collect();
        if labels.get(..5) != Some(&["ADWPC", "ePOWPC", "CPWPC", "WSSBAM", "SAPR3BAM"][..]) {
            return Err(format!("{}: unexpected agent order {:?}", name, labels));
        }
    }

    let received = server.received()?;
    if received.len() != 20 {
        return Err(format!("expected 20 requests, got {}", received.len()));
    }
    if !received.iter().all(|request| {
        request.target == "/wbx/health"
            && request
                .body
                .contains("<attribute name=\"version\" value=\"-1\" />")
    }) {
        return Err("expected update requests to /wbx/health".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_wpc_fetches_policy_data_for_the_agent() -> Result<(), String> {
    let Some((url, server)) = spawn_stub_service_or_skip(OK_REPLY)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_barrage(
        dir.path(),
        [
            "wpc",
            "2",
            "3",
            "1",
            "0",
            "--endpoint",
            url.as_str(),
            "--user",
            "carol",
        ],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let received = server.received()?;
    if received.len() != 3 {
        return Err(format!("expected 3 requests, got {}", received.len()));
    }
    for request in &received {
        if request.target != "/wbx/policy-data?agent=ePOWPC" {
            return Err(format!("unexpected target {}", request.target));
        }
        if !request
            .body
            .contains("<attribute name=\"UserName\" value=\"carol\" />")
            || !request
                .body
                .contains("<attribute name=\"IpAddress\" value=\"192.168.2.116\" />")
        {
            return Err(format!("unexpected payload {}", request.body));
        }
    }

    let files = result_files(dir.path(), "_thread_0.csv")?;
    let file = files.first().ok_or("missing result file")?;
    let rows = read_lines(file)?;
    if rows.len() != 4 {
        return Err(format!("expected header and three rows, got {:?}", rows));
    }
    Ok(())
}

#[test]
fn e2e_error_responses_are_recorded_not_fatal() -> Result<(), String> {
    let Some((url, _server)) = spawn_stub_service_or_skip(ERROR_REPLY)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let output = run_barrage(
        dir.path(),
        ["wpc", "1", "2", "1", "0", "--endpoint", url.as_str()],
    )?;
    if !output.status.success() {
        return Err(describe(&output));
    }

    let files = result_files(dir.path(), "_thread_0.csv")?;
    let file = files.first().ok_or("missing result file")?;
    let rows = read_lines(file)?;
    let expected_tail = format!(",ERROR: {}", ERROR_REPLY);
    if rows.len() != 3 || !rows.iter().skip(1).all(|row| row.ends_with(&expected_tail)) {
        return Err(format!("expected two error rows, got {:?}", rows));
    }
    Ok(())
}

#[test]
fn e2e_config_file_supplies_the_endpoint() -> Result<(), String> {
    let Some((url, server)) = spawn_stub_service_or_skip(OK_REPLY)? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let config = format!("endpoint = \"{}\"\noutput_dir = \"results\"\ntimeout = \"5s\"\n", url);
    fs::write(dir.path().join("barrage.toml"), config)
        .map_err(|err| format!("write config failed: {}", err))?;

    let output = run_barrage(dir.path(), ["health", "1", "1", "1", "0"])?;
    if !output.status.success() {
        return Err(describe(&output));
    }
    if server.received()?.len() != 5 {
        return Err("expected one report per agent".to_owned());
    }
    if result_files(&dir.path().join("results"), ".csv")?.len() != 1 {
        return Err("expected the result file in the configured directory".to_owned());
    }
    Ok(())
}

#[test]
fn e2e_invalid_invocations_do_no_work() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;

    let unknown_test = run_barrage(
        dir.path(),
        ["health", "3", "1", "1", "0", "--endpoint", "http://127.0.0.1:9"],
    )?;
    if unknown_test.status.success() {
        return Err("expected unknown test number to fail".to_owned());
    }

    let missing_endpoint = run_barrage(dir.path(), ["wpc", "1", "1", "1", "0"])?;
    if missing_endpoint.status.success() {
        return Err("expected a missing endpoint to fail".to_owned());
    }

    let bad_usage = run_barrage(dir.path(), ["events", "index.txt"])?;
    if bad_usage.status.success() {
        return Err("expected missing arguments to fail".to_owned());
    }

    let missing_index = run_barrage(
        dir.path(),
        ["events", "absent.txt", "1", "0", "--endpoint", "http://127.0.0.1:9"],
    )?;
    if missing_index.status.success() {
        return Err("expected a missing index file to fail".to_owned());
    }

    if !result_files(dir.path(), ".csv")?.is_empty() {
        return Err("expected no result files".to_owned());
    }
    Ok(())
}
