use super::*;

#[test]
fn sequence_encodes_payload_as_base64() {
    assert_eq!(
        build_sequence("", Osc52Env { is_tmux: false }).unwrap(),
        "\x1b]52;c;\x07"
    );

    let seq = build_sequence("zsite", Osc52Env { is_tmux: false }).unwrap();
    assert_eq!(seq, "\x1b]52;c;enNpdGU=\x07");

    // 两字节尾部要补一个 '=',一字节尾部补两个。
    assert_eq!(
        build_sequence("ab", Osc52Env { is_tmux: false }).unwrap(),
        "\x1b]52;c;YWI=\x07"
    );
    assert_eq!(
        build_sequence("a", Osc52Env { is_tmux: false }).unwrap(),
        "\x1b]52;c;YQ==\x07"
    );
}

#[test]
fn sequence_is_dcs_wrapped_under_tmux() {
    let seq = build_sequence("ok", Osc52Env { is_tmux: true }).unwrap();
    assert_eq!(seq, "\x1bPtmux;\x1b\x1b]52;c;b2s=\x07\x1b\\");
}

#[test]
fn oversized_payload_is_rejected() {
    let big = "x".repeat(OSC52_MAX_BYTES + 1);
    let err = build_sequence(&big, Osc52Env::default()).unwrap_err();
    assert_eq!(
        err,
        Osc52Error::TooLarge {
            bytes: OSC52_MAX_BYTES + 1
        }
    );
}

#[test]
fn write_sequence_flushes_to_writer() {
    let mut buf = Vec::new();
    write_sequence(&mut buf, "hi", Osc52Env { is_tmux: false }).unwrap();
    assert_eq!(buf, b"\x1b]52;c;aGk=\x07");
}
