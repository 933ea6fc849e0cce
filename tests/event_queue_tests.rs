use volume_viewer::events::{EventQueue, ViewerEvent};

#[cfg(test)]
mod event_queue_tests {
    use super::*;

    #[test]
    fn test_events_are_consumed_once() {
        let mut queue = EventQueue::new();
        queue.push(ViewerEvent::CameraChanged);
        queue.push(ViewerEvent::TransferFunctionChanged);

        assert_eq!(
            queue.drain(),
            vec![ViewerEvent::CameraChanged, ViewerEvent::TransferFunctionChanged]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_latest_payload_wins_in_original_slot() {
        let mut queue = EventQueue::new();
        queue.push(ViewerEvent::IsoValueChanged(0.1));
        queue.push(ViewerEvent::CameraChanged);
        queue.push(ViewerEvent::IsoValueChanged(0.7));
        queue.push(ViewerEvent::CameraChanged);

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![ViewerEvent::IsoValueChanged(0.7), ViewerEvent::CameraChanged]
        );
    }

    #[test]
    fn test_resizes_coalesce_to_last_size() {
        let mut queue = EventQueue::new();
        queue.extend([
            ViewerEvent::ViewportResized { width: 640, height: 480 },
            ViewerEvent::RenderModeChanged,
            ViewerEvent::ViewportResized { width: 1280, height: 720 },
        ]);
        assert_eq!(
            queue.drain(),
            vec![
                ViewerEvent::ViewportResized { width: 1280, height: 720 },
                ViewerEvent::RenderModeChanged,
            ]
        );
    }
}
