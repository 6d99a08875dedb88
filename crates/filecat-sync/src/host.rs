//! Local host identification

/// Name this machine reports itself under
///
/// Uses `gethostname(2)` on Unix, then the `COMPUTERNAME` and `HOSTNAME`
/// environment variables, then `localhost`.
pub fn local_host_name() -> String {
    #[cfg(unix)]
    if let Some(name) = unix_host_name() {
        return name;
    }

    ["COMPUTERNAME", "HOSTNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(unix)]
fn unix_host_name() -> Option<String> {
    let mut buffer = [0u8; 256];

    // SAFETY: the buffer is valid for writes of its full length.
    let rc = unsafe { libc::gethostname(buffer.as_mut_ptr().cast(), buffer.len()) };
    if rc != 0 {
        return None;
    }

    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
    let name = String::from_utf8_lossy(&buffer[..end]).trim().to_string();
    (!name.is_empty()).then_some(name)
}
