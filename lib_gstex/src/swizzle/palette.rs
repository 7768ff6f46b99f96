/// Bytes per palette entry.
const ENTRY_SIZE: usize = 4;
/// Entries per interleave group.
const GROUP_ENTRIES: usize = 32;
/// Bytes covered by one `part` of the index formula.
const PART_BYTES: usize = 32;

/// Storage position of the entry emitted at each step of a 32-entry group.
fn group_order() -> impl Iterator<Item = usize> {
    (0..2).flat_map(|block| {
        (0..2).flat_map(move |stripe| (0..8).map(move |color| block * 8 + stripe * 16 + color))
    })
}

/// Reorders a raw RGBA palette between linear order and the interleaved
/// (CSM1) order the GS uses for lookups.
///
/// Within every group of 32 entries, entries 8..16 and 16..24 trade places;
/// groups shorter than 32 entries keep the slots that exist. This is its own
/// inverse, so the same call converts in both directions.
///
/// Input whose length is not a multiple of 32 bytes is returned unchanged.
pub fn reorder_palette(data: &[u8]) -> Vec<u8> {
    if data.len() % PART_BYTES != 0 {
        return data.to_vec();
    }

    let entries = data.len() / ENTRY_SIZE;
    let parts = data.len() / PART_BYTES;
    let mut output = Vec::with_capacity(data.len());
    for part in 0..parts {
        for index in group_order().map(|slot| part * GROUP_ENTRIES + slot) {
            if index < entries {
                output.extend_from_slice(&data[index * ENTRY_SIZE..(index + 1) * ENTRY_SIZE]);
            }
        }
    }
    output
}
