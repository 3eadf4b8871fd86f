/// Encodes text for a base-14 font with `WinAnsiEncoding`.
///
/// ASCII and Latin-1 map to themselves; the cp1252 extras (bullet, dashes,
/// curly quotes, ellipsis, euro, trademark) map to their 0x80..0x9F slots.
/// Anything else becomes `?`.
pub fn to_winansi_bytes(text: &str) -> Vec<u8> {
    text.chars().map(winansi_byte).collect()
}

pub fn is_winansi_encodable(c: char) -> bool {
    winansi_byte(c) != b'?' || c == '?'
}

fn winansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7E}' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => b'?',
    }
}
