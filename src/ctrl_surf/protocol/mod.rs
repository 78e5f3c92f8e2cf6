pub mod mcu;
