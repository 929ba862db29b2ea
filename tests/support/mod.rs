#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const JAVAX_SERVLET: &str = "javax/servlet/Servlet.class";
pub const JAVAX_JSP_PAGE: &str = "javax/servlet/jsp/JspPage.class";
pub const JAKARTA_SERVLET: &str = "jakarta/servlet/Servlet.class";
pub const JAKARTA_JSP_PAGE: &str = "jakarta/servlet/jsp/JspPage.class";

/// A throwaway Tomcat installation tree.
pub struct FakeTomcat {
    dir: TempDir,
}

impl FakeTomcat {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("allocate fake tomcat home"),
        }
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    /// Write a jar at `rel` containing the given `(entry, body)` pairs.
    pub fn jar(&self, rel: &str, entries: &[(&str, &str)]) -> PathBuf {
        let path = self.home().join(rel);
        write_jar(&path, entries).expect("write fixture jar");
        path
    }

    /// Write a file that is not a valid zip at `rel`.
    pub fn corrupt_jar(&self, rel: &str) -> PathBuf {
        let path = self.home().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"PK\x03\x04 truncated").unwrap();
        path
    }

    pub fn catalina(&self, rel_dir: &str, server_info: &str) -> PathBuf {
        let properties = format!(
            "# Licensed to the Apache Software Foundation\nserver.info={server_info}\nserver.number=0.0.0.0\nserver.built=Jan 1 2024\n"
        );
        self.jar(
            &format!("{rel_dir}/catalina.jar"),
            &[
                ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
                ("org/apache/catalina/startup/Catalina.class", ""),
                ("org/apache/catalina/util/ServerInfo.properties", properties.as_str()),
            ],
        )
    }
}

/// Write a jar whose only entry is a deflated `ServerInfo.properties`, then
/// flip bytes in the middle of its compressed data.
pub fn write_jar_with_corrupt_server_info(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body: String = (0..200)
        .map(|i| format!("server.note.{i}=build {i} of Apache Tomcat/9.0.{i}\n"))
        .chain(std::iter::once("server.info=Apache Tomcat/9.0.0\n".to_string()))
        .collect();

    let mut writer = zip::ZipWriter::new(File::create(path)?);
    writer.start_file(
        "org/apache/catalina/util/ServerInfo.properties",
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated),
    )?;
    writer.write_all(body.as_bytes())?;
    writer.finish()?;

    // Local file header: 30 fixed bytes, then the name and extra field.
    let mut bytes = fs::read(path)?;
    let name_len = u16::from_le_bytes([bytes[26], bytes[27]]) as usize;
    let extra_len = u16::from_le_bytes([bytes[28], bytes[29]]) as usize;
    let compressed_len =
        u32::from_le_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
    if compressed_len < 40 {
        bail!("compressed entry too small to corrupt: {compressed_len} bytes");
    }
    let data_start = 30 + name_len + extra_len;
    let middle = data_start + compressed_len / 2;
    for byte in &mut bytes[middle..middle + 10] {
        *byte ^= 0xA5;
    }
    fs::write(path, bytes)?;
    Ok(())
}

pub fn write_jar(path: &Path, entries: &[(&str, &str)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = zip::ZipWriter::new(file);
    for (name, body) in entries {
        writer.start_file(*name, SimpleFileOptions::default())?;
        writer.write_all(body.as_bytes())?;
    }
    writer.finish()?;
    Ok(())
}

pub fn cli_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_catalina-probe"));
    cmd.env_remove("CATALINA_HOME")
        .env_remove("CATALINA_BASE")
        .env_remove("RUST_LOG")
        .env_remove("CATALINA_PROBE_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn run_failing(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(output)
}
