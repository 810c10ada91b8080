#[macro_export]
macro_rules! validate {
	($assert:expr, $err:expr) => {
        {
        if ($assert) {
            Ok(())
        } else {
            let error_code: $crate::error::ErrorCode = $err;
            $crate::msg!("Error {} thrown at {}:{}", error_code, file!(), line!());
            Err(error_code)
        }
        }
	};
	($assert:expr, $err:expr, $($arg:tt)+) => {
        {
        if ($assert) {
            Ok(())
        } else {
            let error_code: $crate::error::ErrorCode = $err;
            $crate::msg!("Error {} thrown at {}:{}", error_code, file!(), line!());
            $crate::msg!($($arg)*);
            Err(error_code)
        }
        }
	};
}
