#[cfg(test)]
mod tests {
    use bitfile::{swap_byte_order, AccessMode, BitFile, BitOrder, Whence};
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_write_then_reopen_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twenty.bits");

        let mut out = BitFile::open(&path, AccessMode::Write, BitOrder::MsbFirst).unwrap();
        assert_eq!(out.write_u64(0xABCDE, 20).unwrap(), 20);
        out.flush().unwrap();
        drop(out);

        // The final partial byte keeps its valid bits at the head.
        assert_eq!(fs::read(&path).unwrap(), vec![0xDE, 0xBC, 0xA0]);

        let mut input = BitFile::open(&path, AccessMode::Read, BitOrder::MsbFirst).unwrap();
        assert_eq!(input.read_u64(20).unwrap(), (0xABCDE, 20));
    }

    #[test]
    fn test_read_modify_write_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rmw.bits");
        fs::write(&path, [0xAA, 0xFF, 0x55]).unwrap();

        let mut cur = BitFile::open(&path, AccessMode::ReadWrite, BitOrder::LsbFirst).unwrap();
        cur.seek(1, 4, Whence::Start).unwrap();
        assert_eq!(cur.write_u64(0, 4).unwrap(), 4);
        cur.flush().unwrap();
        drop(cur);

        // Only the addressed nibble changed.
        assert_eq!(fs::read(&path).unwrap(), vec![0xAA, 0x0F, 0x55]);
    }

    #[test]
    fn test_append_mode_extends_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("append.bits");
        fs::write(&path, [0x11]).unwrap();

        let mut cur = BitFile::open(&path, AccessMode::Append, BitOrder::LsbFirst).unwrap();
        assert_eq!(cur.write_u64(0x22, 8).unwrap(), 8);
        drop(cur);

        assert_eq!(fs::read(&path).unwrap(), vec![0x11, 0x22]);
    }

    #[test]
    fn test_parsed_access_mode_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mode.bits");

        let mode: AccessMode = "w+".parse().unwrap();
        assert_eq!(mode, AccessMode::ReadWrite);

        let mut cur = BitFile::open(&path, mode, BitOrder::LsbFirst).unwrap();
        assert_eq!(cur.write_u64(0b101_1101, 7).unwrap(), 7);
        cur.seek(0, 0, Whence::Start).unwrap();
        assert_eq!(cur.read_u64(7).unwrap(), (0b101_1101, 7));
    }

    #[test]
    fn test_endian_swap_over_file_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("endian.bits");
        fs::write(&path, [0x74, 0x75, 0x76, 0x77]).unwrap();

        let mut cur = BitFile::open(&path, AccessMode::Read, BitOrder::MsbFirst).unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(cur.read_bits(&mut buf, 32).unwrap(), 32);
        assert_eq!(buf, [0x74, 0x75, 0x76, 0x77]);

        swap_byte_order(&mut buf, 32);
        assert_eq!(buf, [0x77, 0x76, 0x75, 0x74]);
    }

    #[test]
    fn test_short_read_at_end_of_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.bits");
        fs::write(&path, [0x74, 0x75]).unwrap();

        let mut cur = BitFile::open(&path, AccessMode::Read, BitOrder::LsbFirst).unwrap();
        let mut buf = [0xFFu8; 3];
        assert_eq!(cur.read_bits(&mut buf, 24).unwrap(), 16);
        assert_eq!(buf, [0x74, 0x75, 0x00]);
        assert!(cur.is_end_of_data());
        assert!(!cur.is_error());
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.bits");
        assert!(BitFile::open(&path, AccessMode::Read, BitOrder::LsbFirst).is_err());
    }
}
