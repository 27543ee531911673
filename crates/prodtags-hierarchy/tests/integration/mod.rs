mod file_roundtrip;
