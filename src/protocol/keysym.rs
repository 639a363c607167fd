//! X Window System keysym values for [`KeyEvent`], and the pointer button
//! mask bits for [`PointerEvent`].
//!
//! Keysym values follow X11/keysymdef.h; the printable Latin-1 range maps
//! 1:1 onto Unicode U+0020..U+007E, so `XK_a` is simply 0x61. Names keep the
//! X11 casing, which encodes whether a symbol is the shifted or unshifted
//! form (`XK_a` vs `XK_A`).
//!
//! [`KeyEvent`]: crate::ClientConn::key_event
//! [`PointerEvent`]: crate::ClientConn::pointer_event

#![allow(non_upper_case_globals)]

// Latin-1 printable characters, identical to their ASCII codes.
pub const XK_space: u32 = 0x0020;
pub const XK_exclam: u32 = 0x0021;
pub const XK_quotedbl: u32 = 0x0022;
pub const XK_numbersign: u32 = 0x0023;
pub const XK_dollar: u32 = 0x0024;
pub const XK_percent: u32 = 0x0025;
pub const XK_ampersand: u32 = 0x0026;
pub const XK_apostrophe: u32 = 0x0027;
pub const XK_parenleft: u32 = 0x0028;
pub const XK_parenright: u32 = 0x0029;
pub const XK_asterisk: u32 = 0x002a;
pub const XK_plus: u32 = 0x002b;
pub const XK_comma: u32 = 0x002c;
pub const XK_minus: u32 = 0x002d;
pub const XK_period: u32 = 0x002e;
pub const XK_slash: u32 = 0x002f;
pub const XK_0: u32 = 0x0030;
pub const XK_1: u32 = 0x0031;
pub const XK_2: u32 = 0x0032;
pub const XK_3: u32 = 0x0033;
pub const XK_4: u32 = 0x0034;
pub const XK_5: u32 = 0x0035;
pub const XK_6: u32 = 0x0036;
pub const XK_7: u32 = 0x0037;
pub const XK_8: u32 = 0x0038;
pub const XK_9: u32 = 0x0039;
pub const XK_colon: u32 = 0x003a;
pub const XK_semicolon: u32 = 0x003b;
pub const XK_less: u32 = 0x003c;
pub const XK_equal: u32 = 0x003d;
pub const XK_greater: u32 = 0x003e;
pub const XK_question: u32 = 0x003f;
pub const XK_at: u32 = 0x0040;
pub const XK_A: u32 = 0x0041;
pub const XK_B: u32 = 0x0042;
pub const XK_C: u32 = 0x0043;
pub const XK_D: u32 = 0x0044;
pub const XK_E: u32 = 0x0045;
pub const XK_F: u32 = 0x0046;
pub const XK_G: u32 = 0x0047;
pub const XK_H: u32 = 0x0048;
pub const XK_I: u32 = 0x0049;
pub const XK_J: u32 = 0x004a;
pub const XK_K: u32 = 0x004b;
pub const XK_L: u32 = 0x004c;
pub const XK_M: u32 = 0x004d;
pub const XK_N: u32 = 0x004e;
pub const XK_O: u32 = 0x004f;
pub const XK_P: u32 = 0x0050;
pub const XK_Q: u32 = 0x0051;
pub const XK_R: u32 = 0x0052;
pub const XK_S: u32 = 0x0053;
pub const XK_T: u32 = 0x0054;
pub const XK_U: u32 = 0x0055;
pub const XK_V: u32 = 0x0056;
pub const XK_W: u32 = 0x0057;
pub const XK_X: u32 = 0x0058;
pub const XK_Y: u32 = 0x0059;
pub const XK_Z: u32 = 0x005a;
pub const XK_bracketleft: u32 = 0x005b;
pub const XK_backslash: u32 = 0x005c;
pub const XK_bracketright: u32 = 0x005d;
pub const XK_asciicircum: u32 = 0x005e;
pub const XK_underscore: u32 = 0x005f;
pub const XK_grave: u32 = 0x0060;
pub const XK_a: u32 = 0x0061;
pub const XK_b: u32 = 0x0062;
pub const XK_c: u32 = 0x0063;
pub const XK_d: u32 = 0x0064;
pub const XK_e: u32 = 0x0065;
pub const XK_f: u32 = 0x0066;
pub const XK_g: u32 = 0x0067;
pub const XK_h: u32 = 0x0068;
pub const XK_i: u32 = 0x0069;
pub const XK_j: u32 = 0x006a;
pub const XK_k: u32 = 0x006b;
pub const XK_l: u32 = 0x006c;
pub const XK_m: u32 = 0x006d;
pub const XK_n: u32 = 0x006e;
pub const XK_o: u32 = 0x006f;
pub const XK_p: u32 = 0x0070;
pub const XK_q: u32 = 0x0071;
pub const XK_r: u32 = 0x0072;
pub const XK_s: u32 = 0x0073;
pub const XK_t: u32 = 0x0074;
pub const XK_u: u32 = 0x0075;
pub const XK_v: u32 = 0x0076;
pub const XK_w: u32 = 0x0077;
pub const XK_x: u32 = 0x0078;
pub const XK_y: u32 = 0x0079;
pub const XK_z: u32 = 0x007a;
pub const XK_braceleft: u32 = 0x007b;
pub const XK_bar: u32 = 0x007c;
pub const XK_braceright: u32 = 0x007d;
pub const XK_asciitilde: u32 = 0x007e;

// Editing keys.
pub const XK_BackSpace: u32 = 0xff08;
pub const XK_Tab: u32 = 0xff09;
pub const XK_Linefeed: u32 = 0xff0a;
pub const XK_Return: u32 = 0xff0d;
pub const XK_Escape: u32 = 0xff1b;
pub const XK_Delete: u32 = 0xffff;

// Navigation.
pub const XK_Home: u32 = 0xff50;
pub const XK_Left: u32 = 0xff51;
pub const XK_Up: u32 = 0xff52;
pub const XK_Right: u32 = 0xff53;
pub const XK_Down: u32 = 0xff54;
pub const XK_Prior: u32 = 0xff55; // Page Up
pub const XK_Next: u32 = 0xff56; // Page Down
pub const XK_End: u32 = 0xff57;
pub const XK_Insert: u32 = 0xff63;

// Function keys.
pub const XK_F1: u32 = 0xffbe;
pub const XK_F2: u32 = 0xffbf;
pub const XK_F3: u32 = 0xffc0;
pub const XK_F4: u32 = 0xffc1;
pub const XK_F5: u32 = 0xffc2;
pub const XK_F6: u32 = 0xffc3;
pub const XK_F7: u32 = 0xffc4;
pub const XK_F8: u32 = 0xffc5;
pub const XK_F9: u32 = 0xffc6;
pub const XK_F10: u32 = 0xffc7;
pub const XK_F11: u32 = 0xffc8;
pub const XK_F12: u32 = 0xffc9;

// Modifiers.
pub const XK_Shift_L: u32 = 0xffe1;
pub const XK_Shift_R: u32 = 0xffe2;
pub const XK_Control_L: u32 = 0xffe3;
pub const XK_Control_R: u32 = 0xffe4;
pub const XK_Caps_Lock: u32 = 0xffe5;
pub const XK_Alt_L: u32 = 0xffe9;
pub const XK_Alt_R: u32 = 0xffea;

/// Pointer button mask bits. OR them together for chords; wheel events are
/// reported as a press/release pair of the corresponding bit.
pub mod button {
    pub const NONE: u8 = 0x00;
    pub const LEFT: u8 = 0x01;
    pub const MIDDLE: u8 = 0x02;
    pub const RIGHT: u8 = 0x04;
    pub const WHEEL_UP: u8 = 0x08;
    pub const WHEEL_DOWN: u8 = 0x10;
}
