use drivers::hal::gpio::{InputPin, OutputPin, PinLevel, PullMode, StatefulOutputPin};
use drivers::platform::bcm2711::gpio::{FuncSelect, GpioChip, GpioError, Pull, RegisterFamily};
use drivers::platform::bcm2711::sim::SimMapper;

fn chip() -> GpioChip<SimMapper> {
    GpioChip::new(SimMapper::new())
}

#[test]
fn output_round_trip_on_pin_17() {
    let chip = chip();
    let mut line = chip.request(17).unwrap();
    line.configure_function(FuncSelect::Output).unwrap();
    line.write_level(1).unwrap();

    let sim = chip.mapper().last_window().unwrap();
    assert_eq!(sim.register(RegisterFamily::Set, 0) & (1 << 17), 1 << 17);
    assert_eq!(sim.register(RegisterFamily::Clear, 0), 0);
    assert_eq!(line.read_level().unwrap(), 1);

    line.write_level(0).unwrap();
    assert_eq!(sim.register(RegisterFamily::Clear, 0), 1 << 17);
    assert_eq!(line.read_level().unwrap(), 0);
}

#[test]
fn write_requires_live_output_function() {
    let chip = chip();
    let mut line = chip.request(17).unwrap();
    assert_eq!(line.write_level(1), Err(GpioError::PinMisconfigured));

    let sim = chip.mapper().last_window().unwrap();
    assert_eq!(sim.register(RegisterFamily::Set, 0), 0);
}

#[test]
fn function_is_reread_from_hardware() {
    let chip = chip();
    let mut line = chip.request(17).unwrap();
    line.configure_function(FuncSelect::Output).unwrap();

    // Someone else turns the pin back into an input behind the line's back.
    let mut other = chip.request(17).unwrap();
    other.configure_function(FuncSelect::Input).unwrap();

    assert_eq!(line.requested_function(), Some(FuncSelect::Output));
    assert_eq!(line.function().unwrap(), FuncSelect::Input);
    assert_eq!(line.write_level(1), Err(GpioError::PinMisconfigured));
}

#[test]
fn out_of_range_level_writes_nothing() {
    let chip = chip();
    let mut line = chip.request(17).unwrap();
    line.configure_function(FuncSelect::Output).unwrap();
    assert_eq!(line.write_level(2), Err(GpioError::OutOfRange));

    let sim = chip.mapper().last_window().unwrap();
    assert_eq!(sim.register(RegisterFamily::Set, 0), 0);
    assert_eq!(sim.register(RegisterFamily::Clear, 0), 0);
}

#[test]
fn bad_pin_leaves_no_mapping_behind() {
    let chip = chip();
    assert_eq!(chip.request(58).unwrap_err(), GpioError::BadPin);
    assert_eq!(chip.mapper().total_mappings(), 0);

    let line = chip.request(0).unwrap();
    assert_eq!(chip.mapper().total_mappings(), 1);
    assert_eq!(line.pin(), 0);
}

#[test]
fn released_line_reports_null_state() {
    let chip = chip();
    let mut line = chip.request(5).unwrap();
    line.release();
    line.release();
    assert!(!line.is_requested());
    assert!(!chip.is_mapped());
    assert_eq!(line.read_level(), Err(GpioError::NullState));
    assert_eq!(line.configure_function(FuncSelect::Output), Err(GpioError::NullState));
    assert_eq!(line.write_level(1), Err(GpioError::NullState));
    assert_eq!(line.set_pull(Pull::Up), Err(GpioError::NullState));
}

#[test]
fn configuring_one_pin_keeps_its_word_neighbours() {
    let chip = chip();
    let mut lines: Vec<_> = (50..=57).map(|pin| chip.request(pin).unwrap()).collect();
    let funcs = [
        FuncSelect::Alt0,
        FuncSelect::Alt1,
        FuncSelect::Alt2,
        FuncSelect::Alt3,
        FuncSelect::Alt4,
        FuncSelect::Alt5,
        FuncSelect::Output,
        FuncSelect::Input,
    ];
    for (line, func) in lines.iter_mut().zip(funcs) {
        line.configure_function(func).unwrap();
    }
    for (line, func) in lines.iter().zip(funcs) {
        assert_eq!(line.function().unwrap(), func, "pin {}", line.pin());
    }

    let sim = chip.mapper().last_window().unwrap();
    assert_eq!(sim.register(RegisterFamily::FunctionSelect, 5) & !0x00FF_FFFF, 0);
    assert_eq!(sim.reserved_writes(), 0);
}

#[test]
fn pull_configuration() {
    let chip = chip();
    let mut a = chip.request(47).unwrap();
    let mut b = chip.request(48).unwrap();
    a.set_pull(Pull::Down).unwrap();
    b.set_pull(PullMode::Up).unwrap();
    assert_eq!(a.pull().unwrap(), Pull::Down);
    assert_eq!(b.pull().unwrap(), Pull::Up);

    let sim = chip.mapper().last_window().unwrap();
    assert_eq!(sim.register(RegisterFamily::PullConfig, 2), 0b10 << 30);
    assert_eq!(sim.register(RegisterFamily::PullConfig, 3), 0b01);

    // 0b11 is reserved in hardware.
    sim.poke(RegisterFamily::PullConfig.layout().window_word(3), 0b11);
    assert_eq!(b.pull(), Err(GpioError::OutOfRange));
}

#[test]
fn input_reads_external_level() {
    let chip = chip();
    let line = chip.request(40).unwrap();
    let sim = chip.mapper().last_window().unwrap();

    assert_eq!(InputPin::read(&line).unwrap(), PinLevel::Low);
    sim.set_pin_level(40, true);
    assert!(line.is_high().unwrap());
    assert_eq!(line.read_level().unwrap(), 1);
}

#[test]
fn hal_output_traits() {
    let chip = chip();
    let mut line = chip.request_labelled(21, "relay").unwrap();
    assert_eq!(line.set_high(), Err(GpioError::PinMisconfigured));

    line.configure_function(FuncSelect::Output).unwrap();
    line.set_high().unwrap();
    assert!(line.is_set_high().unwrap());
    line.toggle().unwrap();
    assert!(line.is_set_low().unwrap());
    line.set_state(true).unwrap();
    assert_eq!(StatefulOutputPin::read(&line).unwrap(), PinLevel::High);
    assert_eq!(line.label(), "relay");
}

#[test]
fn addresses_are_fixed_at_request() {
    let chip = chip();
    let line = chip.request(32).unwrap();
    let set = line.address(RegisterFamily::Set);
    assert_eq!((set.word_index(), set.shift(), set.write_mask()), (1, 0, 0x03FF_FFFF));
    let fsel = line.address(RegisterFamily::FunctionSelect);
    assert_eq!((fsel.word_index(), fsel.shift()), (3, 6));
}
