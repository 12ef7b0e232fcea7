//! Frame-accurate mapping from the global timeline into source assets.

use crate::model::layer::TimeRange;

/// Map a global timeline frame to a source-local frame.
///
/// Returns `None` when the range is inactive at `global_frame` (the caller
/// renders nothing) or when the asset has no frames. An active frame maps to
/// `source_offset + (global_frame - in_frame)`, clamped to
/// `[0, frame_count - 1]`; clamping tolerates time ranges that slightly
/// outrun the decoded content.
pub fn map_global_frame_to_source(
    global_frame: u64,
    time_range: &TimeRange,
    frame_count: u64,
) -> Option<u64> {
    if !time_range.contains(global_frame) {
        return None;
    }
    if frame_count == 0 {
        return None;
    }
    let source_frame = time_range.source_offset + (global_frame - time_range.in_frame);
    Some(source_frame.min(frame_count - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping_inside_range() {
        let range = TimeRange::new(0, 10);
        assert_eq!(map_global_frame_to_source(9, &range, 30), Some(9));
    }

    #[test]
    fn test_out_frame_is_exclusive() {
        let range = TimeRange::new(0, 10);
        assert_eq!(map_global_frame_to_source(10, &range, 30), None);
    }

    #[test]
    fn test_before_in_frame_is_inactive() {
        let range = TimeRange::new(5, 10);
        assert_eq!(map_global_frame_to_source(4, &range, 30), None);
    }

    #[test]
    fn test_source_offset_shifts_mapping() {
        let range = TimeRange::with_offset(0, 10, 5);
        assert_eq!(map_global_frame_to_source(0, &range, 30), Some(5));
    }

    #[test]
    fn test_clamps_to_last_decoded_frame() {
        // Range runs past the decoded content; mapping clamps instead of failing.
        let range = TimeRange::new(0, 40);
        assert_eq!(map_global_frame_to_source(35, &range, 30), Some(29));
    }

    #[test]
    fn test_non_zero_in_frame() {
        let range = TimeRange::new(10, 20);
        assert_eq!(map_global_frame_to_source(13, &range, 30), Some(3));
    }

    #[test]
    fn test_zero_frame_asset() {
        let range = TimeRange::new(0, 10);
        assert_eq!(map_global_frame_to_source(0, &range, 0), None);
    }
}
