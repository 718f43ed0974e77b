#[cfg(test)]
mod tests {
    use crate::Color;
    use crate::Key;
    use crate::KeyEvent;
    use crate::Modifiers;
    use crate::Rect;
    use crate::Vec2;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#FF5733");
        assert_eq!(c, Color(255, 87, 51, 255));

        let c_alpha = Color::from_hex("#FF5733AA");
        assert_eq!(c_alpha, Color(255, 87, 51, 170));

        assert_eq!(Color::from_hex("#zz"), Color::BLACK);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect {
            x: 10.0,
            y: 10.0,
            w: 100.0,
            h: 50.0,
        };

        assert!(rect.contains(Vec2 { x: 50.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 5.0, y: 30.0 }));
        assert!(!rect.contains(Vec2 { x: 50.0, y: 70.0 }));
    }

    #[test]
    fn test_rect_inflate_grows_hit_area() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        let p = Vec2::new(8.0, 12.0);
        assert!(!rect.contains(p));
        assert!(rect.inflate(4.0).contains(p));
    }

    #[test]
    fn test_shortcut_matching() {
        let ev = KeyEvent::new(Key::Character('A'), Modifiers::CONTROL | Modifiers::SHIFT);
        assert!(ev.is_shortcut('a'));
        assert!(!KeyEvent::plain(Key::Character('a')).is_shortcut('a'));
        assert!(ev.modifiers.shift());
    }
}
