mod calc;
