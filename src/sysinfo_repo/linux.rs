// Linux-specific helpers: whole-device disk counters from /proc/diskstats.

/// /proc/diskstats counts 512-byte sectors regardless of the device's block size.
const SECTOR_BYTES: u64 = 512;

/// Sum of (read, written) bytes over whole block devices (partitions excluded,
/// so nothing is counted twice). `None` off Linux or when /proc is unavailable.
pub(super) fn read_block_device_totals() -> Option<(u64, u64)> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/diskstats").ok()?;
        parse_diskstats(&content, |name| {
            !name.starts_with("loop")
                && !name.starts_with("ram")
                && std::path::Path::new("/sys/block").join(name).exists()
        })
    }
    #[cfg(not(target_os = "linux"))]
    None
}

/// Parses /proc/diskstats lines: `major minor name reads merged sectors_read ms
/// writes merged sectors_written ...`. Only devices accepted by `is_whole_device` count.
pub(super) fn parse_diskstats(
    content: &str,
    is_whole_device: impl Fn(&str) -> bool,
) -> Option<(u64, u64)> {
    let mut saw_device = false;
    let mut read = 0u64;
    let mut written = 0u64;
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 || !is_whole_device(fields[2]) {
            continue;
        }
        let (Ok(sectors_read), Ok(sectors_written)) =
            (fields[5].parse::<u64>(), fields[9].parse::<u64>())
        else {
            continue;
        };
        saw_device = true;
        read = read.saturating_add(sectors_read.saturating_mul(SECTOR_BYTES));
        written = written.saturating_add(sectors_written.saturating_mul(SECTOR_BYTES));
    }
    saw_device.then_some((read, written))
}

#[cfg(test)]
mod tests {
    use super::parse_diskstats;

    const DISKSTATS: &str = "\
   7       0 loop0 60 0 2222 12 0 0 0 0 0 20 12 0 0 0 0
 259       0 nvme0n1 1000 10 4000 300 500 20 8000 700 0 900 1000 0 0 0 0
 259       1 nvme0n1p1 900 10 3800 280 490 20 7900 690 0 880 970 0 0 0 0
   8       0 sda 10 0 2 1 4 0 6 1 0 2 2
";

    #[test]
    fn sums_whole_devices_only() {
        let totals = parse_diskstats(DISKSTATS, |name| name == "nvme0n1" || name == "sda");
        assert_eq!(totals, Some(((4000 + 2) * 512, (8000 + 6) * 512)));
    }

    #[test]
    fn no_matching_device_is_none() {
        assert_eq!(parse_diskstats(DISKSTATS, |_| false), None);
        assert_eq!(parse_diskstats("", |_| true), None);
    }

    #[test]
    fn short_or_garbled_lines_are_skipped() {
        let content = "8 0 sda 1 2\n8 16 sdb 1 0 x 1 1 0 y 1\n8 32 sdc 1 0 10 1 1 0 20 1\n";
        assert_eq!(parse_diskstats(content, |_| true), Some((10 * 512, 20 * 512)));
    }
}
